use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Render one statement against a JSON argument and show what gets bound
    Render {
        #[arg(long, required = true, help = "Mapper file path (repeatable)")]
        mapper: Vec<String>,

        #[arg(long, help = "Statement id, fully qualified or unique short id")]
        statement: String,

        #[arg(long, help = "Statement argument as JSON")]
        params: Option<String>,

        /// Placeholder style: "mysql" or "postgres"
        #[arg(long, default_value = "mysql")]
        dialect: String,

        #[arg(long, help = "Settings file path")]
        settings: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the JSON report to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Build every statement and report configuration errors
    Check {
        #[arg(long, required = true, help = "Mapper file path (repeatable)")]
        mapper: Vec<String>,

        #[arg(long, help = "Settings file path")]
        settings: Option<String>,
    },
}
