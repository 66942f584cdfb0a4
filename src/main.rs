use std::{env, process};

use order_sheets_lib::{process_sales, resolve_input_path, SystemClock};

fn main() {
    env_logger::init();

    let result = resolve_input_path(env::args_os().skip(1))
        .and_then(|path| process_sales(&path, &SystemClock));

    match result {
        Ok(summary) => {
            println!(
                "wrote {} order sheet(s) to {}",
                summary.sheets_written,
                summary.output_dir.display()
            );
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
