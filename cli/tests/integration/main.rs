//! Integration test harness: runs the compiled `dockhand` binary.

mod cli_tests;
mod config_command;
mod remote_commands;
