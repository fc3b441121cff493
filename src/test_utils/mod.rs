mod logging_env;

mod mock_server;
pub(crate) use mock_server::{MockServer, dropping_server};
