use std::env;
use std::process::ExitCode;

use markup_parser::parse_file;

fn main() -> ExitCode {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "markup-parser".to_string());

    let Some(path) = args.next() else {
        eprintln!("{program}(): not enough arguments, pass a filepath");
        return ExitCode::FAILURE;
    };

    match parse_file(&path) {
        Ok(tree) => {
            print!("{}", tree.print());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{program}(): {err}");
            ExitCode::FAILURE
        }
    }
}
