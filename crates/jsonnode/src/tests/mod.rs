mod arbitrary;
mod free_functions;
