pub mod console;
pub mod uci;
pub mod uci_parser;
