//! End-to-end scenarios driving the oracle through delivered blocks.

use oracle_crypto::{acc_address_from_key, key_hash, val_address_from_key, vote_hash};
use oracle_engine::{GenesisState, OracleError, OracleEvent};
use oracle_node::{InMemoryApp, NodeError};
use oracle_nullables::NullStaking;
use oracle_transactions::{MsgAggregateExchangeRatePrevote, MsgAggregateExchangeRateVote, OracleMsg};
use oracle_types::{AccAddress, Coin, Dec, Denom, OracleParams, ValAddress, BASE_DENOM};
use std::sync::{Arc, Mutex};

const POWER_REDUCTION: u128 = 1_000_000;
const SALT: &str = "1234";

struct Voter {
    feeder: AccAddress,
    validator: ValAddress,
}

impl Voter {
    fn new(i: usize) -> Self {
        let key = key_hash(format!("operator-{i}").as_bytes());
        Self {
            feeder: acc_address_from_key(&key),
            validator: val_address_from_key(&key),
        }
    }

    fn prevote(&self, rates: &str) -> OracleMsg {
        let hash = vote_hash(SALT, rates, &self.validator);
        MsgAggregateExchangeRatePrevote::new(hash.to_string(), self.feeder.clone(), self.validator.clone())
            .into()
    }

    fn reveal(&self, rates: &str) -> OracleMsg {
        MsgAggregateExchangeRateVote::new(SALT, rates, self.feeder.clone(), self.validator.clone())
            .into()
    }
}

fn whitelist(names: &[&str]) -> Vec<Denom> {
    names
        .iter()
        .map(|name| Denom::new(*name, Dec::with_prec(25, 4)))
        .collect()
}

fn setup(validators: usize, params: OracleParams) -> (InMemoryApp, Vec<Voter>) {
    let staking = NullStaking::new(100, POWER_REDUCTION);
    let voters: Vec<Voter> = (0..validators).map(Voter::new).collect();
    for voter in &voters {
        staking.add_validator(&voter.validator, 100 * POWER_REDUCTION);
    }
    let app = InMemoryApp::in_memory(staking);
    let genesis = GenesisState {
        params,
        ..GenesisState::default()
    };
    app.init_genesis(&genesis).unwrap();
    (app, voters)
}

/// Apply every block in `from..=to`, asking `msgs_at` for each block's messages.
fn run_blocks(app: &mut InMemoryApp, from: u64, to: u64, mut msgs_at: impl FnMut(u64) -> Vec<OracleMsg>) {
    for height in from..=to {
        let msgs = msgs_at(height);
        let result = app.apply_block(height, &msgs).unwrap();
        for tx in &result.txs {
            assert!(tx.is_ok(), "height {height}: {} rejected: {:?}", tx.kind, tx.error);
        }
    }
}

fn dec(s: &str) -> Dec {
    s.parse().unwrap()
}

#[test]
fn lone_voter_below_threshold_publishes_nothing() {
    let params = OracleParams {
        whitelist: whitelist(&["usdr"]),
        ..OracleParams::default()
    };
    let (mut app, voters) = setup(3, params);
    let rates = "1700.00usdr";

    run_blocks(&mut app, 1, 9, |h| match h {
        1 => vec![voters[0].prevote(rates)],
        6 => vec![voters[0].reveal(rates)],
        _ => vec![],
    });
    assert!(matches!(
        app.keeper().exchange_rate("usdr"),
        Err(OracleError::ExchangeRateNotFound(_))
    ));

    run_blocks(&mut app, 10, 19, |h| match h {
        10 => voters.iter().map(|v| v.prevote(rates)).collect(),
        15 => voters.iter().map(|v| v.reveal(rates)).collect(),
        _ => vec![],
    });
    assert_eq!(app.keeper().exchange_rate("usdr").unwrap(), dec("1700"));
    assert!(app.keeper().aggregate_votes().unwrap().is_empty());
}

#[test]
fn cross_rates_publish_against_reference_denom() {
    let params = OracleParams {
        whitelist: whitelist(&["ukrw", "uusd"]),
        reward_distribution_window: 5,
        ..OracleParams::default()
    };
    let (mut app, voters) = setup(3, params);
    app.keeper()
        .bank()
        .mint("oracle", Coin::new(BASE_DENOM, 1_000_000));

    let published = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&published);
    app.subscribe(Box::new(move |event| {
        if let OracleEvent::ExchangeRateUpdate { denom, .. } = event {
            sink.lock().unwrap().push(denom.clone());
        }
    }));

    let rates = "1300ukrw,1uusd";
    run_blocks(&mut app, 0, 4, |h| match h {
        0 => voters.iter().map(|v| v.prevote(rates)).collect(),
        _ => vec![],
    });
    let mut last = None;
    for height in 5..=9 {
        let msgs: Vec<OracleMsg> = if height == 5 {
            voters.iter().map(|v| v.reveal(rates)).collect()
        } else {
            vec![]
        };
        last = Some(app.apply_block(height, &msgs).unwrap());
    }
    let outcome = last.unwrap().end_block;

    assert_eq!(outcome.reference_denom.as_deref(), Some("ukrw"));
    assert_eq!(app.keeper().exchange_rate("ukrw").unwrap(), dec("1300"));
    assert_eq!(app.keeper().exchange_rate("uusd").unwrap(), Dec::ONE);
    assert_eq!(*published.lock().unwrap(), vec!["ukrw".to_string(), "uusd".to_string()]);

    // Equal weight: each winner gets a truncated third of the whole pool.
    assert_eq!(outcome.distributed.amount_of(BASE_DENOM), 999_999);
    for voter in &voters {
        let rewards = app.keeper().distribution().rewards_of(&voter.validator);
        assert_eq!(rewards.amount_of(BASE_DENOM), 333_333);
    }
    assert_eq!(app.keeper().bank().balance("oracle", BASE_DENOM), 1);
}

#[test]
fn abstaining_voter_is_not_counted_as_missing() {
    let params = OracleParams {
        whitelist: whitelist(&["usdr"]),
        ..OracleParams::default()
    };
    let (mut app, voters) = setup(3, params);
    let vote_of = |i: usize| if i == 2 { "0usdr" } else { "1700usdr" };

    run_blocks(&mut app, 0, 4, |h| match h {
        0 => voters.iter().enumerate().map(|(i, v)| v.prevote(vote_of(i))).collect(),
        _ => vec![],
    });
    // The empty first period counted as a miss for everyone.
    let before: Vec<u64> = voters
        .iter()
        .map(|v| app.keeper().miss_counter(&v.validator).unwrap())
        .collect();
    assert_eq!(before, vec![1, 1, 1]);

    run_blocks(&mut app, 5, 9, |h| match h {
        5 => voters.iter().enumerate().map(|(i, v)| v.reveal(vote_of(i))).collect(),
        _ => vec![],
    });

    assert_eq!(app.keeper().exchange_rate("usdr").unwrap(), dec("1700"));
    for (voter, missed) in voters.iter().zip(before) {
        assert_eq!(app.keeper().miss_counter(&voter.validator).unwrap(), missed);
    }
}

#[test]
fn chronic_misser_is_slashed_and_jailed_at_window_end() {
    let params = OracleParams {
        vote_period: 1,
        slash_window: 100,
        reward_distribution_window: 100,
        min_valid_per_window: Dec::with_prec(9, 1),
        slash_fraction: Dec::with_prec(1, 2),
        whitelist: whitelist(&["usdr"]),
        ..OracleParams::default()
    };
    let (mut app, voters) = setup(3, params);
    let rates = "1.0usdr";

    let skips = |i: usize, h: u64| match i {
        0 => (110..=120).contains(&h),
        1 => (150..=159).contains(&h),
        _ => false,
    };
    let block = |h: u64, in_window: bool| -> Vec<OracleMsg> {
        let mut msgs = Vec::new();
        for (i, voter) in voters.iter().enumerate() {
            if h > 0 && !(in_window && skips(i, h)) {
                msgs.push(voter.reveal(rates));
            }
            msgs.push(voter.prevote(rates));
        }
        msgs
    };

    run_blocks(&mut app, 0, 99, |h| block(h, false));
    for voter in &voters {
        assert_eq!(app.keeper().miss_counter(&voter.validator).unwrap(), 0);
    }

    let mut slashed = Vec::new();
    for height in 100..=199 {
        let result = app.apply_block(height, &block(height, true)).unwrap();
        if result.end_block.slash_window_closed {
            slashed = result.end_block.slashed;
        }
    }

    assert_eq!(slashed, vec![voters[0].validator.clone()]);
    let staking = app.keeper().staking();
    assert_eq!(staking.tokens(&voters[0].validator), 99 * POWER_REDUCTION);
    assert!(staking.is_jailed(&voters[0].validator));
    assert_eq!(staking.tokens(&voters[1].validator), 100 * POWER_REDUCTION);
    assert!(!staking.is_jailed(&voters[1].validator));

    let records = staking.slashes();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].infraction_height, 197);
    assert_eq!(records[0].power, 100);

    for voter in &voters {
        assert_eq!(app.keeper().miss_counter(&voter.validator).unwrap(), 0);
    }
}

#[test]
fn out_of_order_block_is_rejected() {
    let (mut app, _) = setup(1, OracleParams::default());
    app.apply_block(10, &[]).unwrap();
    assert!(matches!(app.apply_block(10, &[]), Err(NodeError::InvalidBlock(_))));
}
