//! JSON routes over the session registry.

use crate::chat::{ChatLine, ChatLog};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::registry::{self, SessionRegistry};
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use quirky_game::{BagEntry, Color, Dimensions, GamePiece, Piece, PlayerSummary, Shape, TurnOutcome};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::{Arc, RwLock};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Running games.
    pub registry: SessionRegistry,
    /// Lobby chat, shared by everyone connected.
    pub chat: Arc<RwLock<ChatLog>>,
}

impl AppState {
    /// Fresh state for `config`.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            registry: SessionRegistry::new(config),
            chat: Arc::new(RwLock::new(ChatLog::new(*config.chat_lines()))),
        }
    }
}

/// Players keyed by name, serialized as a JSON object in turn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTable(pub Vec<(String, PlayerSummary)>);

impl Serialize for PlayerTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, summary) in &self.0 {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PlayerTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PlayerTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of player names to summaries")
            }

            // Entries keep the order they arrive in.
            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PlayerTable, A::Error> {
                let mut players = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, PlayerSummary>()? {
                    players.push(entry);
                }
                Ok(PlayerTable(players))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// One entry of the game list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListing {
    /// Game name.
    pub name: String,
    /// Players in turn order.
    pub players: PlayerTable,
}

/// Body of `POST /games`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Desired game name.
    pub name: String,
    /// Player creating (and joining) the game.
    pub player: String,
}

/// Response of `POST /games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGame {
    /// Name actually assigned to the game.
    pub name: String,
}

/// Body of `POST /games/{game}/players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Name of the joining player.
    pub name: String,
}

/// Body of `POST /games/{game}/board`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceTileRequest {
    /// Player placing the tile.
    pub player: String,
    /// Tile shape.
    pub shape: Shape,
    /// Tile color.
    pub color: Color,
    /// Target row.
    pub row: i32,
    /// Target column.
    pub column: i32,
}

/// Response of `POST /games/{game}/board`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    /// Points earned by the placement.
    pub points: u32,
}

/// Body of chat posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPost {
    /// Who is speaking.
    pub name: String,
    /// What they say.
    pub input: String,
}

/// Query of chat fetches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatQuery {
    /// Only return lines after this id; absent, negative or non-numeric
    /// means everything.
    pub lastid: Option<String>,
}

impl ChatQuery {
    fn last_id(&self) -> Option<u64> {
        let id: i64 = self.lastid.as_deref()?.trim().parse().ok()?;
        u64::try_from(id).ok()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/games", get(list_games).post(create_game))
        .route("/games/{game}/board", get(get_board).post(place_tile))
        .route("/games/{game}/pieces", get(get_bag))
        .route("/games/{game}/dimensions", get(get_dimensions))
        .route("/games/{game}/players", get(get_players).post(join_game))
        .route("/games/{game}/players/{player}", delete(leave_game))
        .route("/games/{game}/players/{player}/end_turn", post(end_turn))
        .route("/games/{game}/players/{player}/pieces", get(get_hand))
        .route("/games/{game}/chat", get(get_game_chat).post(post_game_chat))
        .route("/chat", get(get_chat).post(post_chat))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Json<Vec<GameListing>> {
    let listings = state
        .registry
        .names()
        .into_iter()
        .filter_map(|name| {
            state
                .registry
                .with_room(&name, |room| PlayerTable(room.session.player_summaries()))
                .ok()
                .map(|players| GameListing { name, players })
        })
        .collect();
    Json(listings)
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<CreatedGame>), ApiError> {
    let name = state.registry.create_session(&req.name, &req.player)?;
    info!(requested = %req.name, assigned = %name, "Game ready");
    Ok((StatusCode::CREATED, Json(CreatedGame { name })))
}

#[instrument(skip(state))]
async fn get_board(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<Vec<GamePiece>>, ApiError> {
    let pieces = state
        .registry
        .with_room(&game, |room| room.session.board_pieces().to_vec())?;
    Ok(Json(pieces))
}

#[instrument(skip(state))]
async fn place_tile(
    State(state): State<AppState>,
    Path(game): Path<String>,
    Json(req): Json<PlaceTileRequest>,
) -> Result<Json<PlacedTile>, ApiError> {
    let piece = Piece::new(req.shape, req.color);
    let points = state
        .registry
        .place_tile(&game, &req.player, piece, req.row, req.column)?;
    Ok(Json(PlacedTile { points }))
}

#[instrument(skip(state))]
async fn get_bag(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<Vec<BagEntry>>, ApiError> {
    let entries = state
        .registry
        .with_room(&game, |room| room.session.bag_entries().to_vec())?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
async fn get_dimensions(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<Dimensions>, ApiError> {
    let dims = state
        .registry
        .with_room(&game, |room| room.session.dimensions())?;
    Ok(Json(dims))
}

#[instrument(skip(state))]
async fn get_players(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<PlayerTable>, ApiError> {
    let players = state
        .registry
        .with_room(&game, |room| PlayerTable(room.session.player_summaries()))?;
    Ok(Json(players))
}

#[instrument(skip(state))]
async fn join_game(
    State(state): State<AppState>,
    Path(game): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<StatusCode, ApiError> {
    state.registry.join_session(&game, &req.name)?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state))]
async fn leave_game(
    State(state): State<AppState>,
    Path((game, player)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.registry.leave_session(&game, &player)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn end_turn(
    State(state): State<AppState>,
    Path((game, player)): Path<(String, String)>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let outcome = state.registry.end_turn(&game, &player)?;
    Ok(Json(outcome))
}

#[instrument(skip(state))]
async fn get_hand(
    State(state): State<AppState>,
    Path((game, player)): Path<(String, String)>,
) -> Result<Json<Vec<Piece>>, ApiError> {
    let hand = state
        .registry
        .with_room(&game, |room| room.session.hand(&player).map(<[Piece]>::to_vec))??;
    Ok(Json(hand))
}

#[instrument(skip(state))]
async fn get_game_chat(
    State(state): State<AppState>,
    Path(game): Path<String>,
    Query(query): Query<ChatQuery>,
) -> Result<Json<Vec<ChatLine>>, ApiError> {
    let lines = state
        .registry
        .with_room(&game, |room| room.chat.since(query.last_id()))?;
    Ok(Json(lines))
}

#[instrument(skip(state, post), fields(name = %post.name))]
async fn post_game_chat(
    State(state): State<AppState>,
    Path(game): Path<String>,
    Json(post): Json<ChatPost>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .with_room_mut(&game, |room| room.chat.push(post.name, post.input))?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state))]
async fn get_chat(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> Json<Vec<ChatLine>> {
    Json(registry::read(&state.chat).since(query.last_id()))
}

#[instrument(skip(state, post), fields(name = %post.name))]
async fn post_chat(State(state): State<AppState>, Json(post): Json<ChatPost>) -> StatusCode {
    registry::write(&state.chat).push(post.name, post.input);
    StatusCode::CREATED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lastid: Option<&str>) -> ChatQuery {
        ChatQuery {
            lastid: lastid.map(str::to_string),
        }
    }

    #[test]
    fn test_chat_query_last_id() {
        assert_eq!(query(None).last_id(), None);
        assert_eq!(query(Some("4")).last_id(), Some(4));
        assert_eq!(query(Some("-1")).last_id(), None);
        assert_eq!(query(Some("abc")).last_id(), None);
        assert_eq!(query(Some("")).last_id(), None);
    }

    #[test]
    fn test_player_table_keeps_turn_order() {
        let summary = |points| PlayerSummary {
            points,
            has_turn: points == 0,
            hand_size: 6,
        };
        let table = PlayerTable(vec![
            ("zed".to_string(), summary(0)),
            ("amy".to_string(), summary(3)),
        ]);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.find("zed").unwrap() < json.find("amy").unwrap());

        let parsed: PlayerTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }
}
