#[macro_use]
extern crate rocket;

use coffee_snake::bot::Bot;
use coffee_snake::config::Config;
use coffee_snake::recorder::{recorder_from_config, GameRecorder, NoopRecorder};
use log::{error, info};
use rocket::fairing::AdHoc;
use std::env;
use std::sync::Arc;

mod handler;

#[launch]
fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Battlesnake Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let recorder: Arc<dyn GameRecorder> = recorder_from_config(&config.recorder)
        .unwrap_or_else(|e| {
            error!("Could not create game recorder ({}), recording disabled", e);
            Arc::new(NoopRecorder)
        });
    let bot = Bot::new(config, recorder);

    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_liftoff("Recorder Prune Loop", |rocket| {
            Box::pin(async move {
                if let Some(bot) = rocket.state::<Bot>() {
                    if bot.recorder().spawn_background().is_some() {
                        info!("Started recorder prune loop");
                    }
                }
            })
        }))
        .attach(AdHoc::on_shutdown("Recorder Shutdown", |rocket| {
            Box::pin(async move {
                if let Some(bot) = rocket.state::<Bot>() {
                    info!("Stopping recorder");
                    bot.recorder().shutdown();
                }
            })
        }))
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "battlesnake/github/coffee-snake");
            })
        }))
        .mount(
            "/",
            routes![handler::index, handler::start, handler::get_move, handler::end],
        )
}
