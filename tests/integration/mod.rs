//! Integration tests with mock HTTP server

pub mod mock_server;
pub mod minimax_tts;
pub mod tool_invocation;
