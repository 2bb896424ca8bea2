/// Asserts that the agent with the given id is present and in `state`.
#[macro_export]
macro_rules! assert_agent_state {
    ($world:expr, $id:expr, $state:expr) => {
        let agent = $world.agent($id).expect("Agent not found in world");
        assert_eq!(
            agent.state, $state,
            "Agent {} is in {:?}, expected {:?}",
            $id, agent.state, $state
        );
    };
}

/// Asserts that the agent with the given id is no longer in the world.
#[macro_export]
macro_rules! assert_agent_removed {
    ($world:expr, $id:expr) => {
        let exists = $world.agents().iter().any(|a| a.id == $id);
        assert!(!exists, "Agent {} should be removed but was found", $id);
    };
}

/// Asserts that the number of agents matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.agents().len(), $count, "Population count mismatch");
    };
}

/// Asserts that two floats differ by at most `tol`.
#[macro_export]
macro_rules! assert_close {
    ($actual:expr, $expected:expr, $tol:expr) => {
        let (actual, expected): (f64, f64) = ($actual, $expected);
        assert!(
            (actual - expected).abs() <= $tol,
            "{} is not within {} of {}",
            actual,
            $tol,
            expected
        );
    };
}
