use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use winit::{
    event::{Event, KeyboardInput, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
};

use vulkano_asteroids::{
    config::{Config, RenderConfig},
    game::{FixedStep, World},
    input::{Controls, KeyAction},
    render_system::{mesh, MeshId, RenderError, RenderSystem},
};

struct Meshes {
    ship: MeshId,
    asteroid: MeshId,
}

fn draw(
    system: &mut RenderSystem,
    meshes: &Meshes,
    world: &World,
    colors: &RenderConfig,
) -> Result<(), RenderError> {
    system.start_frame()?;
    system.render_instances(
        meshes.asteroid,
        &world.asteroid_instances(),
        colors.asteroid_color,
    )?;
    system.render_instances(meshes.ship, &world.ship_instances(), colors.ship_color)?;
    system.finish_frame()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    let event_loop = EventLoop::new();
    let mut system =
        RenderSystem::new(&event_loop, &config).context("initialising the render system")?;

    let meshes = Meshes {
        ship: system.add_mesh(&mesh::ship_mesh().context("tessellating ship")?)?,
        asteroid: system.add_mesh(&mesh::asteroid_mesh().context("tessellating asteroid")?)?,
    };

    let mut world = World::new(&config);
    let mut controls = Controls::default();
    let mut clock = FixedStep::new(
        config.simulation.tick_rate,
        config.simulation.max_ticks_per_frame,
    );
    log::info!(
        "Simulating at {:?} per tick with {} asteroids",
        clock.step(),
        world.asteroids.len()
    );

    let mut last_frame = Instant::now();
    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(key),
                            state,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if controls.handle_key(key, state) == KeyAction::Exit {
                *control_flow = ControlFlow::Exit;
            }
        }
        Event::WindowEvent {
            event: WindowEvent::Focused(false),
            ..
        } => {
            // key releases are not delivered while unfocused
            controls = Controls::default();
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            *control_flow = ControlFlow::Exit;
        }
        Event::WindowEvent {
            event: WindowEvent::Resized(_),
            ..
        } => {
            system.request_swapchain_recreation();
        }
        Event::RedrawEventsCleared => {
            let now = Instant::now();
            for _ in 0..clock.advance(now - last_frame) {
                world.tick(&controls);
            }
            last_frame = now;

            if let Err(e) = draw(&mut system, &meshes, &world, &config.render) {
                log::error!("Rendering failed: {:?}", anyhow::Error::from(e));
                *control_flow = ControlFlow::ExitWithCode(1);
            }
        }
        _ => {}
    })
}
