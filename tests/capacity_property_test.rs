//! Property test: no interleaving of register and cancel operations may
//! leave the seat counter out of sync with the registration rows or push
//! it past capacity.

mod helpers;

use helpers::*;
use proptest::prelude::*;

use CampusHub::store::RegistrationStore;
use CampusHub::utils::errors::CampusHubError;

#[derive(Debug, Clone)]
enum Op {
    Register(usize),
    Cancel(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize).prop_map(Op::Register),
        (0..4usize).prop_map(Op::Cancel),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn seat_counter_matches_rows_after_any_op_sequence(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        runtime.block_on(async {
            let backend = TestBackend::new();
            let organizer = backend.seed_organizer("orga").await;
            let event = published_event(organizer.id, 2);
            backend.seed_event(&event).await;

            let mut users = Vec::new();
            for name in ["a", "b", "c", "d"] {
                users.push(backend.seed_user(name).await);
            }

            for op in &ops {
                match op {
                    Op::Register(i) => {
                        match backend
                            .registration_service
                            .register_for_event(users[*i].id, event.id)
                            .await
                        {
                            Ok(_) => {}
                            Err(
                                CampusHubError::AlreadyRegistered
                                | CampusHubError::AlreadyWaitlisted,
                            ) => {}
                            Err(err) => panic!("unexpected register error: {err}"),
                        }
                    }
                    Op::Cancel(i) => {
                        let latest = backend
                            .registrations
                            .latest_by_user_and_event(users[*i].id, event.id)
                            .await
                            .unwrap();
                        if let Some(registration) = latest {
                            match backend
                                .registration_service
                                .cancel_registration(users[*i].id, registration.id)
                                .await
                            {
                                Ok(()) | Err(CampusHubError::NotCancellable) => {}
                                Err(err) => panic!("unexpected cancel error: {err}"),
                            }
                        }
                    }
                }

                assert_capacity_invariant(&backend, event.id).await;
            }
        });
    }
}
