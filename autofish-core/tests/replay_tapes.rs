use autofish_core::constants::TAPE_HEADER_SIZE;
use autofish_core::input::Pulse;
use autofish_core::sim::{play_session, SessionSetup};
use autofish_core::tape::{parse_tape, serialize_tape};
use autofish_core::{verify_tape, AutoFishConfig, BobberController, TapeError};

const SEEDS: [u32; 4] = [0xDEAD_BEEF, 0xC0FF_EE11, 0x1234_5678, 0xA57E_0001];

fn record(seed: u32, config: AutoFishConfig, max_ticks: u32) -> Vec<u8> {
    let mut controller = BobberController::new(config);
    let mut input = Pulse { period: 23, duty: 7 };
    let (result, presses) = play_session(
        SessionSetup::from_seed(seed),
        &mut controller,
        &mut input,
        max_ticks,
        |_, _| {},
    );
    serialize_tape(&presses, &result)
}

#[test]
fn recorded_sessions_verify_under_the_same_config() {
    for config in [
        AutoFishConfig::default(),
        AutoFishConfig {
            faster_speed: true,
            catch_treasure: false,
            ..AutoFishConfig::default()
        },
    ] {
        for seed in SEEDS {
            let bytes = record(seed, config, 4_000);
            let tape = parse_tape(&bytes, 4_000).expect("recorded tape should parse");
            let journal = verify_tape(&bytes, 4_000, config)
                .unwrap_or_else(|err| panic!("seed={seed:#x}: {err}"));
            assert_eq!(journal.seed, seed);
            assert_eq!(journal.tick_count, tape.header.tick_count);
            assert_eq!(journal.outcome, tape.footer.outcome);
            assert_eq!(journal.tape_checksum, tape.footer.checksum);
        }
    }
}

#[test]
fn tampered_press_is_rejected_before_replay() {
    let mut bytes = record(0xDEAD_BEEF, AutoFishConfig::default(), 600);
    bytes[TAPE_HEADER_SIZE] ^= 0x01;
    let err = verify_tape(&bytes, 600, AutoFishConfig::default()).unwrap_err();
    assert!(matches!(err, TapeError::CrcMismatch { .. }), "{err}");
}

#[test]
fn tape_longer_than_limit_is_rejected() {
    let bytes = record(0xC0FF_EE11, AutoFishConfig::default(), 600);
    let tape = parse_tape(&bytes, 600).expect("tape should parse");
    let limit = tape.header.tick_count - 1;
    assert!(matches!(
        verify_tape(&bytes, limit, AutoFishConfig::default()),
        Err(TapeError::TickCountOutOfRange { .. })
    ));
}
