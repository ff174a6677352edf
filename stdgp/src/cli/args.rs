// CLI argument parsing.

use clap::Parser;

use crate::options::cli_args::OptionsArgs;

#[rustfmt::skip]
#[derive(Parser, Debug, Clone)]
#[command(name = "stdgp")]
#[command(about = "Breed one generation from a random GP population and print it")]
pub struct Cli {
    /// Number of terminals, named x0..x{n-1}.
    #[arg(long, default_value_t = 2)]
    pub n_terminals: usize,

    /// Operators as `name` (binary) or `name:arity` (comma-separated). Defaults to +,-,*,/
    #[arg(long, value_delimiter = ',')]
    pub operators: Option<Vec<String>>,

    /// Model identifier stored on every individual.
    #[arg(long, default_value = "stdgp")]
    pub model_name: String,

    /// Fitness metric label stored on every individual.
    #[arg(long, default_value = "RMSE")]
    pub fitness_type: String,

    /// How many members of the bred population to print.
    #[arg(long, default_value_t = 10)]
    pub show: usize,

    #[command(flatten)]
    pub options: OptionsArgs,
}
