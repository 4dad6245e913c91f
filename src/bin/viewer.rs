use eframe::egui;
use iondose::app::IonDoseApp;

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("{}", iondose::version_banner());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "iondose – electron depth dose",
        options,
        Box::new(|_cc| {
            let mut app = IonDoseApp::default();
            // A file given on the command line is opened straight away.
            if let Some(path) = std::env::args_os().nth(1) {
                app.state.open(std::path::Path::new(&path));
            }
            Ok(Box::new(app))
        }),
    )
}
