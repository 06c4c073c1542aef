use std::path::Path;
use std::process::ExitCode;
use tgapack::Error;

fn run() -> Result<(), Error> {
    let args: Vec<String> = std::env::args().collect();
    match args.as_slice() {
        [_, input, output] => tgapack::convert_png_to_tga(Path::new(input), Path::new(output)),
        _ => Err(Error::Usage {
            program: args
                .first()
                .cloned()
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned()),
        }),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
