mod app_command;
mod config;
mod simulated;
