use clap::{Parser as ClapParser, Subcommand};
use sift_lang::cli::{self, CheckOptions, CheckResult, CliError, CompileOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sift")]
#[command(about = "Sift - parse, evaluate, and compile filter expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and evaluate a filter expression
    Check {
        /// The filter expression
        expression: String,

        /// Dialect: keyword or symbolic
        #[arg(short, long, default_value = "keyword")]
        dialect: String,

        /// JSON document to evaluate against (reads from stdin if piped)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Compile a filter expression to a parameterized WHERE clause
    Compile {
        /// The filter expression
        expression: String,

        /// Dialect: keyword or symbolic
        #[arg(short, long, default_value = "keyword")]
        dialect: String,

        /// Declare a reference path as collection-valued (repeatable)
        #[arg(short, long = "collection")]
        collections: Vec<String>,
    },

    /// Parse a filter expression and dump its AST
    Ast {
        /// The filter expression
        expression: String,

        /// Dialect: keyword or symbolic
        #[arg(short, long, default_value = "keyword")]
        dialect: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            expression,
            dialect,
            input,
            pretty,
            syntax_only,
        } => run_check(expression, dialect, input, pretty, syntax_only),
        Commands::Compile {
            expression,
            dialect,
            collections,
        } => run_compile(expression, dialect, collections),
        Commands::Ast {
            expression,
            dialect,
        } => run_ast(expression, dialect),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    expression: String,
    dialect: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        expression,
        dialect,
        input,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .map_err(CliError::Json)?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_compile(
    expression: String,
    dialect: String,
    collections: Vec<String>,
) -> Result<(), CliError> {
    let options = CompileOptions {
        expression,
        dialect,
        collections,
    };

    let predicate = cli::execute_compile(&options)?;
    println!("WHERE {}", predicate.sql);
    if !predicate.params.is_empty() {
        let params: Vec<String> = predicate
            .params
            .iter()
            .map(|value| value.as_string())
            .collect();
        println!("params: [{}]", params.join(", "));
    }
    if predicate.distinct {
        println!("distinct: true");
    }
    Ok(())
}

fn run_ast(expression: String, dialect: String) -> Result<(), CliError> {
    let dialect = cli::dialect_by_name(&dialect).ok_or(CliError::UnknownDialect(dialect))?;
    let ast = dialect.parse(&expression)?;
    println!("{:#?}", ast);
    Ok(())
}
