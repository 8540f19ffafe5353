//! Icon fonts, stylesheets and a gallery page from a folder of SVG icons.

use iconforge::core;

fn main() {
    let cli_args = core::platform::get_cli_args();
    match core::runner::run_app(cli_args) {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
