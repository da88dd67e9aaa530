use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kira-kmer", version, about = "Markov k-mer profiles for FASTA/FASTQ")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count k-mers and print one `kmer<TAB>count` row per k-mer.
    Count(CountArgs),
    /// Score query sequences against a reference profile.
    Score(ScoreArgs),
    /// Compare the profiles of two inputs.
    Compare(CompareArgs),
}

#[derive(Args, Clone)]
pub struct ProfileArgs {
    #[arg(short = 'k', long)]
    pub k: usize,

    #[arg(long, default_value = "ACGT")]
    pub alphabet: String,

    #[arg(long, value_enum, default_value_t = FormatArg::Fasta)]
    pub format: FormatArg,

    /// Also count the reverse complement of every record.
    #[arg(long, default_value_t = false)]
    pub both_strands: bool,

    /// Drop records that are too short or hold symbols outside the alphabet.
    #[arg(long, default_value_t = false)]
    pub skip_invalid: bool,
}

#[derive(Parser)]
pub struct CountArgs {
    pub input: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Print zero-count k-mers as well.
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

#[derive(Parser)]
pub struct ScoreArgs {
    pub reference: PathBuf,

    pub query: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,

    #[arg(long, value_enum)]
    pub query_format: Option<FormatArg>,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,
}

#[derive(Parser)]
pub struct CompareArgs {
    pub first: PathBuf,

    pub second: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    #[value(name = "fasta")]
    Fasta,
    #[value(name = "fastq")]
    Fastq,
}
