fn main() {
    let command_line_interface = routegen::cli::CommandLineInterface::load();
    command_line_interface.run();
}
