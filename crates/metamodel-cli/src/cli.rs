use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "metamodel",
    about = "Metamodel: build, validate and inspect facet metamodels of domain classes",
    version
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. `debug`, `metamodel_kernel=trace`)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the facet factories, validators and post-processors in execution order
    Factories {
        /// Metamodel configuration (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the metamodel of a class-descriptor file and print it
    Introspect {
        /// Class descriptors (JSON array)
        model: String,

        /// Metamodel configuration (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Print only this type (type name or logical type name)
        #[arg(long)]
        r#type: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the metamodel and print its validation report
    Validate {
        /// Class descriptors (JSON array)
        model: String,

        /// Metamodel configuration (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Exit with status 2 when the report is rejected
        #[arg(long)]
        fail_on_error: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the layout of one type
    Layout {
        /// Class descriptors (JSON array)
        model: String,

        /// Type name or logical type name
        type_name: String,

        /// Metamodel configuration (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
