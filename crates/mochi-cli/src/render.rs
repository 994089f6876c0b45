use std::fmt::Write as _;

use mochi_engine::Game;

/// Board plus the counters panel.
pub fn status(game: &Game) -> String {
    let mut s = String::new();
    let _ = write!(s, "\n{}", game.grid());
    let idle = game.idle_seconds();
    let _ = writeln!(
        s,
        "best tile: {}   healing points: {}   sleepiness: {} / {}   mochi: {}",
        game.grid().highest_tile(),
        game.currency(),
        game.sleepiness(),
        game.rules().thresholds.asleep,
        game.pet_state()
    );
    let _ = writeln!(
        s,
        "idle: {:02}:{:02} (+{}P){}{}",
        idle / 60,
        idle % 60,
        game.idle_points(),
        if game.can_claim_reward() { "   [c] claim reward" } else { "" },
        if game.can_undo() { "   [u] undo" } else { "" },
    );
    s
}

/// Catalog listing with ownership marks.
pub fn shop(game: &Game) -> String {
    let mut s = String::new();
    for item in &game.rules().furniture {
        let mark = if game.furniture().is_owned(&item.id) { "owned" } else { "" };
        let _ = writeln!(s, "{:<14} {:<18} {:>5}P  {mark}", item.id, item.name, item.price);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use mochi_engine::Rules;

    #[test]
    fn status_shows_counters() {
        let mut game = Game::seeded(Rules::default(), 1).unwrap();
        game.tick_idle(75);
        let text = status(&game);
        assert!(text.contains("healing points: 0"));
        assert!(text.contains("sleepiness: 0 / 5000"));
        assert!(text.contains("mochi: awake"));
        assert!(text.contains("idle: 01:15 (+7P)"));
        assert!(!text.contains("claim reward"));
    }

    #[test]
    fn shop_lists_catalog() {
        let game = Game::seeded(Rules::default(), 1).unwrap();
        let text = shop(&game);
        assert_eq!(text.lines().count(), 12);
        assert!(text.contains("hammock"));
    }
}
