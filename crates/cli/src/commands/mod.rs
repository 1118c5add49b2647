//! Command implementations for uvcctl CLI

pub mod catalog;
pub mod ctrl;
pub mod unit;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum UnitCommands {
    /// List units and the controls discovered on them
    List {
        /// Show every physical control and its mappings
        #[arg(short, long)]
        detailed: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CtrlCommands {
    /// List every control in id order
    List {
        /// Show bounds, defaults and flags
        #[arg(short, long)]
        detailed: bool,
    },

    /// Describe one control
    Query {
        /// Control id (decimal or 0x-prefixed hex) or name
        control: String,
        /// Describe the first control after the given one
        #[arg(long)]
        next: bool,
    },

    /// Show the entries of a menu control
    Menu {
        /// Control id (decimal or 0x-prefixed hex) or name
        control: String,
        /// Single entry to show
        index: Option<u32>,
    },
}
