mod common;
mod routing;
mod state;
