mod app;
mod cli;
mod view;

use anyhow::{Context, anyhow};
use clap::Parser;
use eframe::{NativeOptions, egui};
use labeler_core::Session;
use rfd::FileDialog;

use crate::app::LabelerApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli::Resolved {
        mut config,
        has_image_dir,
    } = cli::Args::parse().resolve()?;
    if !has_image_dir {
        match FileDialog::new().set_directory(".").pick_folder() {
            Some(dir) => config.image_dir = dir,
            None => {
                tracing::info!("no image folder chosen");
                return Ok(());
            }
        }
    }
    if config.classes.is_empty() {
        tracing::warn!("no classes configured; pass --class or set classes in the config file");
    }

    let session = Session::open(config).context("could not start labeling session")?;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 560.0]),
        ..Default::default()
    };
    let title = format!("Image labeler {}", env!("LABELER_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(LabelerApp::new(session)))
        }),
    )
    .map_err(|e| anyhow!("application stopped with error: {e}"))
}
