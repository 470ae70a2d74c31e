//! Property tests over randomly played games.
//!
//! A seeded driver plays whole games through a `Session`: it rolls with
//! `DiceRng`, delegates dice when the owner has finished, and picks among
//! the legal moves at random. Every property is checked along the way.

use pegboard::core::{DiceRng, GameConfig, GameState, Move, PlayerId, TeamConfig, TeamId};
use pegboard::replay::{deserialize_state, hash_state, serialize_state};
use pegboard::rules::{validate_state, RulesEngine, TrackRules};
use pegboard::session::{validate_session, ClientMessage, ServerMessage, Session};
use proptest::prelude::*;

/// Options picked for one generated game.
#[derive(Clone, Debug)]
struct Setup {
    players: usize,
    double_dice: bool,
    kill_roll: bool,
    fast_track: bool,
    team_play: bool,
    seed: u64,
}

impl Setup {
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::new(self.players)
            .with_double_dice(self.double_dice)
            .with_kill_roll(self.kill_roll)
            .with_fast_track(self.fast_track);
        if self.team_play && self.players % 2 == 0 {
            // Alternate seats sit on the same team.
            let team = |parity: usize| {
                TeamConfig::new(
                    TeamId::new(parity as u8),
                    PlayerId::all(self.players).filter(move |p| p.index() % 2 == parity),
                )
            };
            config = config.with_teams(vec![team(0), team(1)]);
        }
        config
    }
}

fn setup() -> impl Strategy<Value = Setup> {
    (
        2usize..=8,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<u64>(),
    )
        .prop_map(
            |(players, double_dice, kill_roll, fast_track, team_play, seed)| Setup {
                players,
                double_dice,
                kill_roll,
                fast_track,
                team_play,
                seed,
            },
        )
}

/// The next message a well-behaved host would send.
fn next_message(session: &Session, rng: &mut DiceRng) -> ClientMessage {
    let state = session.state();
    let economy = session.economy();
    let owner = state.current_player();

    if economy.is_awaiting_roll() {
        let count = if economy.banked > 0 {
            1
        } else {
            state.config.options.dice_per_roll()
        };
        return ClientMessage::Roll {
            actor_id: owner,
            dice: rng.roll(count).to_vec(),
        };
    }

    let delegating = state.config.options.team_play && state.has_finished(owner);
    for (die_index, die) in economy.pending.iter().enumerate() {
        let actors: Vec<PlayerId> = match die.controller {
            Some(controller) => vec![controller],
            None if delegating => PlayerId::all(state.player_count())
                .filter(|&p| p != owner && state.config.are_teammates(owner, p))
                .collect(),
            None => vec![owner],
        };

        for actor in actors {
            let moves = session.rules().legal_moves(state, actor, &[die.value]);
            if moves.is_empty() {
                continue;
            }
            if die.controller.is_none() && delegating {
                return ClientMessage::AssignPendingDie {
                    actor_id: owner,
                    die_index,
                    controller_id: actor,
                };
            }
            let pick = rng.roll_die() as usize % moves.len();
            return ClientMessage::Move {
                actor_id: actor,
                die_index: Some(die_index),
                mv: moves[pick].clone(),
            };
        }
    }

    panic!("session is resolving dice but no die has a legal move");
}

/// Play up to `steps` messages, calling `check` after each accepted one.
fn drive(
    setup: &Setup,
    steps: usize,
    mut check: impl FnMut(&Session, &ServerMessage),
) -> Session {
    let mut session = Session::start(setup.config()).unwrap();
    let mut rng = DiceRng::new(setup.seed);

    for _ in 0..steps {
        if session.state().is_ended() {
            break;
        }
        let message = next_message(&session, &mut rng);
        let reply = session.handle_client_message(message.clone());
        assert!(!reply.is_error(), "{message:?} rejected: {reply:?}");
        check(&session, &reply);
    }
    session
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_invariants_hold_along_random_games(setup in setup()) {
        drive(&setup, 400, |session, _| {
            assert_eq!(validate_state(session.state()), Ok(()));
            assert_eq!(validate_session(session.state(), session.economy()), Ok(()));
        });
    }

    #[test]
    fn prop_same_seed_same_game(setup in setup()) {
        let a = drive(&setup, 250, |_, _| {});
        let b = drive(&setup, 250, |_, _| {});

        prop_assert_eq!(hash_state(a.state()), hash_state(b.state()));
        prop_assert_eq!(a.log(), b.log());
    }

    #[test]
    fn prop_replay_reaches_the_same_state(setup in setup()) {
        let session = drive(&setup, 250, |_, _| {});
        let json = session.replay_file().to_json().unwrap();

        let file = pegboard::replay::ReplayFile::from_json(&json).unwrap();
        let end = file.replay(&TrackRules::new()).unwrap();

        prop_assert_eq!(&end, session.state());
    }

    #[test]
    fn prop_legal_moves_are_pure(setup in setup(), die in 1u8..=6) {
        let rules = TrackRules::new();
        drive(&setup, 150, |session, _| {
            let state: &GameState = session.state();
            let before = hash_state(state);
            let actor = state.current_player();

            let first = rules.legal_moves(state, actor, &[die]);
            let second = rules.legal_moves(state, actor, &[die]);

            assert_eq!(first, second);
            assert_eq!(hash_state(state), before);
            for mv in &first {
                let _ = rules.apply_move(state, mv);
            }
            assert_eq!(hash_state(state), before);
        });
    }

    #[test]
    fn prop_hash_survives_serialization(setup in setup()) {
        drive(&setup, 120, |session, _| {
            let state = session.state();
            let restored = deserialize_state(&serialize_state(state).unwrap()).unwrap();

            assert_eq!(&restored, state);
            assert_eq!(hash_state(&restored), hash_state(state));
        });
    }

    #[test]
    fn prop_every_turn_change_is_a_logged_pass(setup in setup()) {
        let session = drive(&setup, 250, |_, _| {});
        let passes = session
            .log()
            .iter()
            .filter(|entry| matches!(entry.mv, Move::Pass(_)))
            .count() as u32;

        prop_assert_eq!(passes, session.state().turn.turn_number - 1);
    }
}
