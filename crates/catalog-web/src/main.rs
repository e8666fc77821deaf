use catalog_observability::ConsoleSink;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = catalog_web::start() {
        catalog_web::report_startup_error(&ConsoleSink, &err);
    }
}
