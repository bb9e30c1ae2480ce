/*
[INPUT]:  Subcommands that run outside the TUI
[OUTPUT]: Interactive configuration writer
[POS]:    CLI module root
[UPDATE]: When adding new non-TUI subcommands
*/

pub mod init;
