mod help;
mod queries;
