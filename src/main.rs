mod analysis;
mod audio;
mod config;
mod geometry;
mod scene;
mod visual;

use anyhow::Context;
use audio::{FileSource, MicSource, SpectrumSource};
use clap::Parser;
use config::Cli;
use nannou::prelude::*;
use nannou_egui::Egui;
use scene::Scene;
use visual::{MeshRenderer, panel};

struct Model {
    scene: Scene,
    source: Box<dyn SpectrumSource>,
    renderer: MeshRenderer,
    egui: Egui,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).exit(exit).run();
}

fn model(app: &App) -> Model {
    match startup(app) {
        Ok(model) => model,
        Err(e) => {
            log::error!("startup failed: {e:#}");
            std::process::exit(1);
        }
    }
}

fn startup(app: &App) -> anyhow::Result<Model> {
    let cli = Cli::parse();
    cli.validate()?;

    let mut source: Box<dyn SpectrumSource> = if cli.mic {
        log::info!("using microphone input");
        Box::new(MicSource::new(cli.fft_size, cli.bins, cli.smoothing))
    } else {
        Box::new(FileSource::load(
            &cli.audio,
            cli.fft_size,
            cli.bins,
            cli.smoothing,
        )?)
    };

    let window_id = app
        .new_window()
        .size(800, 800)
        .title("circle fft")
        .key_pressed(key_pressed)
        .resized(resized)
        .raw_event(raw_window_event)
        .view(view)
        .build()
        .map_err(anyhow::Error::msg)
        .context("Failed to open window")?;
    let egui = {
        let window = app
            .window(window_id)
            .context("Window closed during startup")?;
        Egui::from_window(&window)
    };

    let mut scene = Scene::new(cli.params());
    scene.setup(source.as_mut(), app.window_rect().xy())?;

    Ok(Model {
        scene,
        source,
        renderer: MeshRenderer::default(),
        egui,
    })
}

fn update(_app: &App, model: &mut Model, update: Update) {
    if let Err(e) = model.scene.update(model.source.as_mut()) {
        log::error!("keeping previous mesh: {e}");
    }

    if model.scene.params.show_panel {
        let triangles = model.scene.mesh().triangle_count();
        model.egui.set_elapsed_time(update.since_start);
        let ctx = model.egui.begin_frame();
        panel::show(&ctx, &mut model.scene.params, triangles);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    model.renderer.draw(&draw, &model.scene);
    if let Err(e) = draw.to_frame(app, &frame) {
        log::error!("failed to draw mesh: {e:?}");
    }
    if model.scene.params.show_panel {
        if let Err(e) = model.egui.draw_to_frame(&frame) {
            log::error!("failed to draw panel: {e:?}");
        }
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match key {
        Key::Escape => app.quit(),
        Key::Space => {
            let params = &mut model.scene.params;
            params.show_panel = !params.show_panel;
            log::info!("panel {}", if params.show_panel { "shown" } else { "hidden" });
        }
        Key::F => {
            let window = app.main_window();
            let fullscreen = !window.is_fullscreen();
            window.set_fullscreen(fullscreen);
            log::info!("fullscreen {fullscreen}");
        }
        _ => {}
    }
}

fn resized(app: &App, model: &mut Model, _size: Vec2) {
    // window_rect() is centred on the origin, so this only re-anchors if that changes
    if let Err(e) = model.scene.resize(app.window_rect().xy()) {
        log::error!("failed to rebuild geometry after resize: {e}");
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

fn exit(_app: &App, mut model: Model) {
    model.scene.shutdown(model.source.as_mut());
}
