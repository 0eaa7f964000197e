// Wire protocol DTOs and conversions for public game server messages.
// Entity ids travel as strings; internally they are u64.

use crate::domain::{
    BulletSnapshot, PickupSnapshot, PlayerInput, PlayerSnapshot, SimEvent, WorldUpdate,
};
use crate::domain::tuning::{ChargeProfile, Tuning};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    // Sent once per connection: assigned identity, the full constant table
    // and the current world snapshot.
    Init(InitDto),
    PlayerJoined {
        player: PlayerStateDto,
    },
    PlayerLeft {
        player_id: String,
    },
    BulletSpawned {
        bullet: BulletStateDto,
    },
    BulletRemoved {
        bullet_id: String,
    },
    PlayerHit {
        target_id: String,
        shooter_id: String,
        damage: f32,
        energy: f32,
    },
    PlayerDied {
        victim_id: String,
        killer_id: Option<String>,
        pickup: PickupStateDto,
        respawn: PlayerStateDto,
    },
    MoneyPickedUp {
        player_id: String,
        pickup_id: String,
        money: f32,
    },
    // Full per-tick snapshot of the world.
    GameState(WorldUpdateDto),
    Pong {
        token: serde_json::Value,
    },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Input(PlayerInputDto),
    Shoot(ShootDto),
    Ping(PingDto),
}

/// Movement input; missing fields default to neutral values.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInputDto {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub boost: bool,
    #[serde(default)]
    pub angle: Option<f32>,
    #[serde(default)]
    pub seq: u64,
}

impl From<PlayerInputDto> for PlayerInput {
    fn from(input: PlayerInputDto) -> Self {
        Self {
            up: input.up,
            down: input.down,
            left: input.left,
            right: input.right,
            boost: input.boost,
            angle: input.angle,
            seq: input.seq,
        }
    }
}

/// Shoot request; unrecognized charge levels are normalized server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct ShootDto {
    #[serde(default)]
    pub charge: u8,
}

/// Ping carries an opaque token echoed back verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct PingDto {
    #[serde(default)]
    pub token: serde_json::Value,
}

/// Connection bootstrap payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitDto {
    pub player_id: String,
    pub config: ConfigDto,
    pub snapshot: WorldUpdateDto,
}

/// Constant configuration table shared with clients on connect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    pub tick_rate: u32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub spawn_padding: f32,
    pub player_radius: f32,
    pub accel: f32,
    pub max_speed: f32,
    pub boost_max_speed: f32,
    pub momentum_decay: f32,
    pub max_energy: f32,
    pub energy_regen: f32,
    pub boost_drain: f32,
    pub invuln_ticks: u32,
    pub starting_money: f32,
    pub weapons: Vec<ChargeProfileDto>,
    pub bullet_lifetime_ticks: u64,
    pub pickup_radius: f32,
    pub magnet_radius: f32,
    pub magnet_pull_speed: f32,
}

impl ConfigDto {
    pub fn new(tuning: &Tuning, tick_rate: u32) -> Self {
        Self {
            tick_rate,
            arena_width: tuning.world.width,
            arena_height: tuning.world.height,
            spawn_padding: tuning.world.spawn_padding,
            player_radius: tuning.player.radius,
            accel: tuning.player.accel,
            max_speed: tuning.player.max_speed,
            boost_max_speed: tuning.player.boost_max_speed,
            momentum_decay: tuning.player.momentum_decay,
            max_energy: tuning.player.max_energy,
            energy_regen: tuning.player.energy_regen,
            boost_drain: tuning.player.boost_drain,
            invuln_ticks: tuning.player.invuln_ticks,
            starting_money: tuning.player.starting_money,
            weapons: tuning.weapon.profiles.iter().map(ChargeProfileDto::from).collect(),
            bullet_lifetime_ticks: tuning.weapon.lifetime_ticks,
            pickup_radius: tuning.pickup.radius,
            magnet_radius: tuning.pickup.magnet_radius,
            magnet_pull_speed: tuning.pickup.pull_speed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeProfileDto {
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub cost: f32,
}

impl From<&ChargeProfile> for ChargeProfileDto {
    fn from(p: &ChargeProfile) -> Self {
        Self {
            speed: p.speed,
            radius: p.radius,
            damage: p.damage,
            cost: p.cost,
        }
    }
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub players: Vec<PlayerStateDto>,
    pub bullets: Vec<BulletStateDto>,
    pub pickups: Vec<PickupStateDto>,
}

impl From<&WorldUpdate> for WorldUpdateDto {
    fn from(update: &WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            players: update.players.iter().map(PlayerStateDto::from).collect(),
            bullets: update.bullets.iter().map(BulletStateDto::from).collect(),
            pickups: update.pickups.iter().map(PickupStateDto::from).collect(),
        }
    }
}

/// Flattened public player state for wire transmission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub energy: f32,
    pub money: f32,
    pub invulnerable: bool,
    pub invuln_ticks: u32,
    pub kill_streak: u32,
    pub bounty_multiplier: f32,
}

impl From<&PlayerSnapshot> for PlayerStateDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            angle: p.angle,
            energy: p.energy,
            money: p.money,
            invulnerable: p.invulnerable,
            invuln_ticks: p.invuln_ticks,
            kill_streak: p.kill_streak,
            bounty_multiplier: p.bounty_multiplier,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletStateDto {
    pub id: String,
    pub owner_id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub charge: u8,
}

impl From<&BulletSnapshot> for BulletStateDto {
    fn from(b: &BulletSnapshot) -> Self {
        Self {
            id: b.id.to_string(),
            owner_id: b.owner_id.to_string(),
            x: b.x,
            y: b.y,
            vx: b.vx,
            vy: b.vy,
            radius: b.radius,
            charge: b.charge,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub amount: f32,
}

impl From<&PickupSnapshot> for PickupStateDto {
    fn from(m: &PickupSnapshot) -> Self {
        Self {
            id: m.id.to_string(),
            x: m.x,
            y: m.y,
            radius: m.radius,
            amount: m.amount,
        }
    }
}

impl From<&SimEvent> for ServerMessage {
    fn from(ev: &SimEvent) -> Self {
        match ev {
            SimEvent::PlayerJoined { player } => ServerMessage::PlayerJoined {
                player: PlayerStateDto::from(player),
            },
            SimEvent::PlayerLeft { player_id } => ServerMessage::PlayerLeft {
                player_id: player_id.to_string(),
            },
            SimEvent::BulletSpawned { bullet } => ServerMessage::BulletSpawned {
                bullet: BulletStateDto::from(bullet),
            },
            SimEvent::BulletRemoved { bullet_id } => ServerMessage::BulletRemoved {
                bullet_id: bullet_id.to_string(),
            },
            SimEvent::PlayerHit {
                target_id,
                shooter_id,
                damage,
                energy,
            } => ServerMessage::PlayerHit {
                target_id: target_id.to_string(),
                shooter_id: shooter_id.to_string(),
                damage: *damage,
                energy: *energy,
            },
            SimEvent::PlayerDied {
                victim_id,
                killer_id,
                pickup,
                respawn,
            } => ServerMessage::PlayerDied {
                victim_id: victim_id.to_string(),
                killer_id: killer_id.map(|id| id.to_string()),
                pickup: PickupStateDto::from(pickup),
                respawn: PlayerStateDto::from(respawn),
            },
            SimEvent::MoneyPickedUp {
                player_id,
                pickup_id,
                money,
            } => ServerMessage::MoneyPickedUp {
                player_id: player_id.to_string(),
                pickup_id: pickup_id.to_string(),
                money: *money,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_messages_use_tagged_envelope() {
        let msg = ServerMessage::PlayerLeft {
            player_id: "42".to_string(),
        };
        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();
        assert_eq!(json["type"], "playerLeft");
        assert_eq!(json["data"]["playerId"], "42");
    }

    #[test]
    fn client_input_defaults_missing_fields_to_neutral() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"input","data":{"seq":3,"right":true}}"#).unwrap();
        match msg {
            ClientMessage::Input(input) => {
                assert!(input.right);
                assert!(!input.up && !input.down && !input.left);
                assert!(!input.boost);
                assert_eq!(input.angle, None);
                assert_eq!(input.seq, 3);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn shoot_and_ping_parse() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"shoot","data":{"charge":2}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Shoot(ShootDto { charge: 2 })));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"ping","data":{"token":"abc"}}"#).unwrap();
        match msg {
            ClientMessage::Ping(ping) => assert_eq!(ping.token, "abc"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn game_state_serializes_full_entity_lists() {
        let update = WorldUpdate {
            tick: 7,
            players: vec![],
            bullets: vec![BulletSnapshot {
                id: 3,
                owner_id: 1,
                x: 1.0,
                y: 2.0,
                vx: 3.0,
                vy: 4.0,
                radius: 4.0,
                charge: 1,
            }],
            pickups: vec![],
        };
        let msg = ServerMessage::GameState(WorldUpdateDto::from(&update));
        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();
        assert_eq!(json["type"], "gameState");
        assert_eq!(json["data"]["tick"], 7);
        assert_eq!(json["data"]["bullets"][0]["ownerId"], "1");
    }
}
