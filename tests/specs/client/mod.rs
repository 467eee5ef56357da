mod commands;
mod events;
