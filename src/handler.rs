// HTTP handler bindings for Battlesnake API endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use coffee_snake::bot::Bot;
use coffee_snake::types::GameState;

/// GET / endpoint
/// Returns bot metadata and appearance configuration
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
/// Records the beginning of a game
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameState>) -> Status {
    bot.start(&start_req);

    Status::Ok
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(bot: &rocket::State<Bot>, move_req: Json<GameState>) -> Json<Value> {
    Json(bot.get_move(&move_req).await)
}

/// POST /end endpoint
/// Finalizes the game recording
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameState>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
