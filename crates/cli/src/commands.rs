use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter list for a target database
    Compile {
        #[arg(long, help = "JSON file holding an array of filter conditions")]
        filters: String,

        #[command(flatten)]
        target: TargetArgs,

        #[arg(long, help = "Index of the first placeholder (default 1)")]
        start_index: Option<usize>,

        #[arg(long, help = "If specified, writes the JSON result to this file instead of stdout")]
        output: Option<String>,
    },
    /// Build a complete SELECT around a filter list
    Select {
        #[arg(long, help = "Table name, optionally schema qualified")]
        table: String,

        #[arg(long, help = "JSON file holding an array of filter conditions")]
        filters: String,

        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        limit: Option<u64>,

        #[arg(long)]
        offset: Option<u64>,

        #[arg(long, help = "If specified, writes the JSON result to this file instead of stdout")]
        output: Option<String>,
    },
    /// Validate and normalize every condition of a filter list
    ValidateFilters {
        #[arg(long, help = "JSON file holding an array of filter conditions")]
        filters: String,

        #[arg(long, help = "If specified, writes the JSON result to this file instead of stdout")]
        output: Option<String>,
    },
    /// List the operators offered for a column type
    Operators {
        /// Declared column type, e.g. "varchar(255)" or "numeric(10,2)"
        #[arg(long)]
        column_type: String,

        #[arg(long, help = "If specified, writes the JSON result to this file instead of stdout")]
        output: Option<String>,
    },
    /// Describe every statement of a SQL script
    Analyze(SqlArgs),
    /// Split a SQL script into statements
    Split(SqlArgs),
    /// Strip comments and redundant whitespace
    Minify(SqlArgs),
    /// Put each clause on its own line
    Format(SqlArgs),
    /// Validate SQL and report dangerous operations
    CheckSql(SqlArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Database type: "postgres", "mysql", "mariadb", "sqlite", "mssql", "mongodb", "es", "cassandra"
    #[arg(long)]
    pub target: Option<String>,

    /// How conditions are combined: "and" or "or"
    #[arg(long)]
    pub logic: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SqlArgs {
    #[arg(long, conflicts_with = "query", help = "SQL file to read (stdin when neither is given)")]
    pub file: Option<String>,

    #[arg(long, help = "Inline SQL text")]
    pub query: Option<String>,

    #[arg(long, help = "If specified, writes the JSON result to this file instead of stdout")]
    pub output: Option<String>,
}
