/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Pressure lost per turn by a venting cell.
    pub vent_rate: f32,
    /// Delay between a breakable being destroyed and the breach opening.
    pub breach_delay: u64,
    /// Delay between two steps of a projectile in flight.
    pub projectile_step_delay: u64,
    /// A venting cell drags the player along with odds 1-in-N per tick.
    pub player_vent_resistance: u32,
    /// Same as `player_vent_resistance` for everything else.
    pub vent_resistance: u32,
    /// Radius of the blast when a bloat bursts.
    pub explosion_radius: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Ticks in one turn. Action costs and delays are expressed in ticks.
    pub const TICKS_PER_TURN: u64 = 100;
    /// Cost of an action that does not say otherwise.
    pub const DEFAULT_ACTION_COST: u64 = Self::TICKS_PER_TURN;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_VENT_RATE: f32 = 0.1;
    pub const DEFAULT_BREACH_DELAY: u64 = 100;
    pub const DEFAULT_PROJECTILE_STEP_DELAY: u64 = 10;
    pub const DEFAULT_PLAYER_VENT_RESISTANCE: u32 = 4;
    pub const DEFAULT_VENT_RESISTANCE: u32 = 2;
    pub const DEFAULT_EXPLOSION_RADIUS: u32 = 5;

    pub fn new() -> Self {
        Self {
            vent_rate: Self::DEFAULT_VENT_RATE,
            breach_delay: Self::DEFAULT_BREACH_DELAY,
            projectile_step_delay: Self::DEFAULT_PROJECTILE_STEP_DELAY,
            player_vent_resistance: Self::DEFAULT_PLAYER_VENT_RESISTANCE,
            vent_resistance: Self::DEFAULT_VENT_RESISTANCE,
            explosion_radius: Self::DEFAULT_EXPLOSION_RADIUS,
        }
    }

    pub fn with_vent_rate(mut self, vent_rate: f32) -> Self {
        self.vent_rate = vent_rate;
        self
    }

    pub fn with_breach_delay(mut self, breach_delay: u64) -> Self {
        self.breach_delay = breach_delay;
        self
    }

    pub fn with_vent_resistance(mut self, player: u32, others: u32) -> Self {
        self.player_vent_resistance = player;
        self.vent_resistance = others;
        self
    }

    /// Converts a tick count into fractional turns.
    pub fn turns(ticks: u64) -> f32 {
        ticks as f32 / Self::TICKS_PER_TURN as f32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
