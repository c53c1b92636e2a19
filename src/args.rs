use clap::Parser;

/// This is a camp performance report program: rankings, team awards and pin completion.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the camp and the data sources.
    /// The paths of the sources are relative to the location of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference report in JSON format. If provided, campreport will
    /// check that the produced report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the report will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The attendance roster (json, csv or xlsx). Ignored when --config is given.
    #[clap(long, value_parser)]
    pub roster: Option<String>,

    /// (file paths) Candidate stamp sheet sources. All of them are read and the one with the
    /// most records is kept. Ignored when --config is given.
    #[clap(long, value_parser)]
    pub stamps: Vec<String>,

    /// (file paths) Candidate level test sources, handled like --stamps.
    #[clap(long, value_parser)]
    pub level_tests: Vec<String>,

    /// (default: the only or first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
