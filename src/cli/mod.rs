// Command-line definitions.

// Top-level parser, subcommands and install options.
pub mod cmd_enums;
// Value types parsed from arguments.
pub mod type_enums;
