// mripipe-cli/src/main.rs

fn main() {
    let status = mripipe_cli::main_with_args(std::env::args_os());
    std::process::exit(status.code());
}
