//! # Deep Link Dispatch
//!
//! A deep link is resolved one router level at a time, outermost first. Each
//! level turns the link into a [`DeepLinkStep`] for its own router:
//!
//! - `Child { target, link, settled }`: the link points into a child of
//!   `target`'s kind. If such a child is live and can take deep links, it
//!   receives `link` and keeps its instance (and everything nested in it).
//!   Otherwise a fresh instance is built from `target`, which carries the
//!   rest of the path, in place of any stale entry of that kind. Either way
//!   the entry ends up in front recording `settled`, a configuration of the
//!   same kind without the link, so a consumed link is never saved or
//!   replayed.
//! - `Replace(stack)`: the link describes this node's whole stack.
//! - `Show(config)`: just bring `config` to front.
//! - `Unresolved`: nothing matched; the node falls back to its defaults.
//!
//! Delegation always wins over rebuilding when the capability is present,
//! including when the target differs from the front entry only by
//! parameters. Dispatching the same link twice leaves the same stack shape.

use log::{debug, warn};

use super::configuration::Configuration;
use super::stack::Router;

#[derive(Debug, Clone, PartialEq)]
pub enum DeepLinkStep<C, L> {
    Child { target: C, link: L, settled: C },
    Replace(Vec<C>),
    Show(C),
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A live child took the rest of the link.
    Delegated,
    /// A fresh child was built for the target.
    Rebuilt,
    Replaced,
    Shown,
    /// The link did not resolve here and the default stack was installed.
    FellBack,
}

/// How one router level reads links of type `L`.
pub trait DeepLinkRoute<L>: Configuration {
    fn route(link: L) -> DeepLinkStep<Self, L>;

    /// The node's default initial stack.
    fn defaults() -> Vec<Self>;
}

/// Resolves `link` against `router` using the configuration's route table.
pub fn dispatch_link<C, L>(router: &mut Router<C, L>, link: L) -> DispatchOutcome
where
    C: DeepLinkRoute<L>,
    L: 'static,
{
    dispatch(router, C::route(link), C::defaults)
}

pub fn dispatch<C, L>(
    router: &mut Router<C, L>,
    step: DeepLinkStep<C, L>,
    defaults: impl FnOnce() -> Vec<C>,
) -> DispatchOutcome
where
    C: Configuration,
    L: 'static,
{
    let outcome = match step {
        DeepLinkStep::Child {
            target,
            link,
            settled,
        } => {
            let delegated = match router
                .find_by_kind(target.kind())
                .and_then(|instance| instance.deep_link_handler())
            {
                Some(handler) => {
                    handler.handle_deep_link(link);
                    true
                }
                None => false,
            };
            if delegated {
                router.process_commands();
                router.retarget(settled);
                DispatchOutcome::Delegated
            } else {
                router.replace_kind_settled(target, settled);
                DispatchOutcome::Rebuilt
            }
        }
        DeepLinkStep::Replace(stack) => match router.replace_all(stack) {
            Ok(()) => DispatchOutcome::Replaced,
            Err(e) => {
                warn!("Deep link produced an unusable stack: {}", e);
                fall_back(router, defaults)
            }
        },
        DeepLinkStep::Show(configuration) => {
            router.bring_to_front(configuration);
            DispatchOutcome::Shown
        }
        DeepLinkStep::Unresolved => {
            warn!("Deep link unresolved at {}, using defaults", router.path());
            fall_back(router, defaults)
        }
    };
    debug!("{}: deep link {:?}", router.path(), outcome);
    outcome
}

fn fall_back<C, L>(router: &mut Router<C, L>, defaults: impl FnOnce() -> Vec<C>) -> DispatchOutcome
where
    C: Configuration,
    L: 'static,
{
    if let Err(e) = router.replace_all(defaults()) {
        warn!("No usable defaults for {}: {}; keeping current stack", router.path(), e);
    }
    DispatchOutcome::FellBack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestConfig, event_log, take_log, test_router};

    use TestConfig::{Root, ScreenA, ScreenB};

    // Links below 100 address ScreenB's parameter, 100 shows ScreenA, 0 is
    // unknown, anything else rebuilds the whole stack.
    impl DeepLinkRoute<u32> for TestConfig {
        fn route(link: u32) -> DeepLinkStep<Self, u32> {
            match link {
                0 => DeepLinkStep::Unresolved,
                1..=99 => DeepLinkStep::Child {
                    target: ScreenB(link),
                    link,
                    settled: ScreenB(link),
                },
                100 => DeepLinkStep::Show(ScreenA),
                _ => DeepLinkStep::Replace(vec![Root, ScreenB(link)]),
            }
        }

        fn defaults() -> Vec<Self> {
            vec![Root]
        }
    }

    #[test]
    fn test_live_target_is_delegated_not_rebuilt() {
        let log = event_log();
        let mut router = test_router(vec![Root], log.clone());
        router.push(ScreenA);
        router.push(ScreenB(5));
        let before = router.snapshot().instances();
        take_log(&log);

        assert_eq!(dispatch_link(&mut router, 9), DispatchOutcome::Delegated);

        let after = router.snapshot();
        assert_eq!(after.configurations(), vec![&Root, &ScreenA, &ScreenB(9)]);
        assert_eq!(after.instances(), before);
        assert_eq!(take_log(&log), vec!["link ScreenB(5) 9"]);
    }

    #[test]
    fn test_dispatching_same_link_twice_is_stable() {
        let mut router = test_router(vec![Root, ScreenA, ScreenB(5)], event_log());
        dispatch_link(&mut router, 9);
        let first = router.snapshot();
        dispatch_link(&mut router, 9);
        assert_eq!(router.snapshot(), first);
    }

    #[test]
    fn test_delegation_brings_background_child_to_front() {
        let mut router = test_router(vec![Root, ScreenB(5), ScreenA], event_log());
        let b_id = router.snapshot().entries[1].instance;

        assert_eq!(dispatch_link(&mut router, 7), DispatchOutcome::Delegated);
        let active = router.snapshot().active().cloned().unwrap();
        assert_eq!(active.configuration, ScreenB(7));
        assert_eq!(active.instance, b_id);
    }

    #[test]
    fn test_missing_target_is_built_and_fronted() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenA], log.clone());
        take_log(&log);

        assert_eq!(dispatch_link(&mut router, 3), DispatchOutcome::Rebuilt);
        assert_eq!(router.configurations(), vec![Root, ScreenA, ScreenB(3)]);
        assert_eq!(take_log(&log), vec!["create ScreenB(3)"]);
    }

    #[test]
    fn test_live_target_without_capability_is_rebuilt() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenA], log.clone());
        let old_a = router.snapshot().entries[1].instance;
        take_log(&log);

        let step = DeepLinkStep::Child {
            target: ScreenA,
            link: 1,
            settled: ScreenA,
        };
        assert_eq!(dispatch(&mut router, step, Vec::new), DispatchOutcome::Rebuilt);
        assert_ne!(router.snapshot().entries[1].instance, old_a);
        assert_eq!(take_log(&log), vec!["create ScreenA", "destroy ScreenA"]);
    }

    #[test]
    fn test_replace_and_show_steps() {
        let mut router = test_router(vec![Root, ScreenA], event_log());

        assert_eq!(dispatch_link(&mut router, 500), DispatchOutcome::Replaced);
        assert_eq!(router.configurations(), vec![Root, ScreenB(500)]);

        assert_eq!(dispatch_link(&mut router, 100), DispatchOutcome::Shown);
        assert_eq!(router.configurations(), vec![Root, ScreenB(500), ScreenA]);
    }

    #[test]
    fn test_unresolved_link_falls_back_to_defaults() {
        let mut router = test_router(vec![Root, ScreenA], event_log());
        assert_eq!(dispatch_link(&mut router, 0), DispatchOutcome::FellBack);
        assert_eq!(router.configurations(), vec![Root]);
    }

    #[test]
    fn test_fallback_without_defaults_keeps_stack() {
        let mut router = test_router(vec![Root, ScreenA], event_log());
        let outcome = dispatch(&mut router, DeepLinkStep::Unresolved, Vec::new);
        assert_eq!(outcome, DispatchOutcome::FellBack);
        assert_eq!(router.len(), 2);
    }
}
