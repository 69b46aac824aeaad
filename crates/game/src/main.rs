mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::bootstrap::init_tracing();
    app::loop_runner::run()
}
