extern crate env_logger;
extern crate lcm_gen_cpp;
extern crate structopt;

use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

/// Translates LCM `.lcm` message definitions into C++ message headers.
///
/// Each `.lcm` source file produces exactly one `<StructName>.hpp` in
/// `--outdir`.
#[derive(Debug, StructOpt)]
#[structopt(raw(setting = "structopt::clap::AppSettings::ColoredHelp"))]
struct Options {
    #[structopt(long = "outdir", parse(from_os_str),
                help = "Directory where generated headers are written.")]
    outdir: PathBuf,

    #[structopt(parse(from_os_str), raw(required = "true"),
                help = "One or more *.lcm source files.")]
    src: Vec<PathBuf>,
}

fn main() {
    env_logger::init();

    let options = Options::from_args();

    // If we were invoked via a build tool's runfiles tree (e.g. `bazel run`),
    // `options.src` must be interpreted relative to the user's cwd, not ours.
    if let Ok(real_cwd) = std::env::var("BUILD_WORKING_DIRECTORY") {
        if let Err(e) = std::env::set_current_dir(&real_cwd) {
            eprintln!("Error: could not chdir to {:?}: {}", real_cwd, e);
            process::exit(1);
        }
    }

    if let Err(errors) = lcm_gen_cpp::generate(&options.src, &options.outdir) {
        for e in &errors {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}
