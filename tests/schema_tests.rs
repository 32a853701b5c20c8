use across::config::SecurityConfig;
use across::db::Store;
use across::domain::{
    DepthUnit, GeoPoint, ObservationStatus, ObservationType, ObservatoryType, ScheduleType,
    UserRoleType, Vocabulary,
};
use across::entities::prelude::*;
use across::models::catalog::{
    NewInstrument, NewObservation, NewObservatory, NewSchedule, NewTelescope,
    ObservationExtension, PhotometricDetails, SpectroscopicDetails,
};
use across::models::user::NewUser;
use sea_orm::EntityTrait;

struct Chain {
    observatory_id: i32,
    telescope_id: i32,
    instrument_id: i32,
    schedule_id: i32,
}

async fn build_chain(store: &Store, name: &str) -> Chain {
    let observatory = store
        .create_observatory(&NewObservatory {
            name: name.to_string(),
            observatory_type: ObservatoryType::SpaceBased,
        })
        .await
        .unwrap();
    let telescope = store
        .create_telescope(&NewTelescope {
            name: format!("{name} telescope"),
            observatory_id: observatory.id,
        })
        .await
        .unwrap();
    let instrument = store
        .create_instrument(&NewInstrument {
            name: format!("{name} camera"),
            telescope_id: telescope.id,
        })
        .await
        .unwrap();
    let schedule = store
        .create_schedule(&NewSchedule {
            name: format!("{name} plan"),
            instrument_id: instrument.id,
            schedule_status: across::domain::ScheduleStatus::Planned,
            schedule_type: ScheduleType::HighFidelity,
        })
        .await
        .unwrap();

    Chain {
        observatory_id: observatory.id,
        telescope_id: telescope.id,
        instrument_id: instrument.id,
        schedule_id: schedule.id,
    }
}

fn photometric(schedule_id: i32, object_name: &str) -> NewObservation {
    NewObservation {
        schedule_id,
        object_name: object_name.to_string(),
        object_position: Some(GeoPoint::new(83.633, 22.0145).unwrap()),
        object_observation_reason: Some("Calibration".to_string()),
        proposal_reference: None,
        pointed_position: None,
        obstime_start: None,
        obstime_end: None,
        exposure_time: Some(120.0),
        observation_status: ObservationStatus::Planned,
        observation_type: ObservationType::Photometric,
        extension: Some(ObservationExtension::Photometric(PhotometricDetails {
            depth: Some(19.2),
            depth_error: Some(0.1),
            depth_unit: Some(DepthUnit::VegaMag),
            position_angle: None,
            central_wavelength: Some(6200.0),
            bandwidth: None,
            filter_name: Some("r".to_string()),
            other_information: None,
        })),
    }
}

#[tokio::test]
async fn test_roles_are_seeded() {
    let store = Store::in_memory().await.unwrap();

    let mut roles: Vec<UserRoleType> = UserRoles::find()
        .all(&store.conn)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();
    roles.sort_by_key(|role| role.code());

    assert_eq!(roles, UserRoleType::ALL.to_vec());
}

#[tokio::test]
async fn test_user_role_links() {
    let store = Store::in_memory().await.unwrap();
    let security = SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    };

    let user = store
        .create_user(
            &NewUser {
                firstname: "Vera".to_string(),
                lastname: "Rubin".to_string(),
                email: "vera@example.org".to_string(),
                password: "dark-matter".to_string(),
                roles: vec![UserRoleType::Viewer],
            },
            &security,
        )
        .await
        .unwrap();

    store
        .grant_role(user.id, UserRoleType::ScheduleEditor)
        .await
        .unwrap();
    // Granting twice is a no-op
    store
        .grant_role(user.id, UserRoleType::ScheduleEditor)
        .await
        .unwrap();

    let roles = store.user_roles(user.id).await.unwrap();
    assert_eq!(roles.len(), 2);
    assert!(roles.contains(&UserRoleType::ScheduleEditor));

    assert!(
        store
            .revoke_role(user.id, UserRoleType::ScheduleEditor)
            .await
            .unwrap()
    );
    assert!(
        !store
            .revoke_role(user.id, UserRoleType::ScheduleEditor)
            .await
            .unwrap()
    );
    assert_eq!(
        store.user_roles(user.id).await.unwrap(),
        vec![UserRoleType::Viewer]
    );

    assert!(store.delete_user(user.id).await.unwrap());
    assert!(UserRoleLinks::find().all(&store.conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_observation_traverses_to_observatory() {
    let store = Store::in_memory().await.unwrap();
    let chain = build_chain(&store, "Hubble").await;

    let observation = store
        .create_observation(&photometric(chain.schedule_id, "M1"))
        .await
        .unwrap();

    let observatory = store
        .observatory_for_observation(observation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(observatory.id, chain.observatory_id);
    assert_eq!(observatory.name, "Hubble");

    assert!(store.observatory_for_observation(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_observation_roundtrip_keeps_position_and_extension() {
    let store = Store::in_memory().await.unwrap();
    let chain = build_chain(&store, "Swift").await;

    let created = store
        .create_observation(&photometric(chain.schedule_id, "Crab"))
        .await
        .unwrap();

    let raw = Observations::find_by_id(created.id)
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        raw.object_position.as_deref(),
        Some("SRID=4326;POINT(83.633 22.0145)")
    );

    let loaded = store.get_observation(created.id).await.unwrap().unwrap();
    let position = loaded.object_position.unwrap();
    assert!((position.ra() - 83.633).abs() < f64::EPSILON);
    assert!((position.dec() - 22.0145).abs() < f64::EPSILON);

    match loaded.extension {
        Some(ObservationExtension::Photometric(details)) => {
            assert_eq!(details.depth_unit, Some(DepthUnit::VegaMag));
            assert_eq!(details.filter_name.as_deref(), Some("r"));
        }
        other => panic!("expected photometric extension, got {other:?}"),
    }
}

#[tokio::test]
async fn test_set_extension_replaces_previous_record() {
    let store = Store::in_memory().await.unwrap();
    let chain = build_chain(&store, "XMM").await;

    let observation = store
        .create_observation(&photometric(chain.schedule_id, "Vela X-1"))
        .await
        .unwrap();

    store
        .set_observation_extension(
            observation.id,
            &ObservationExtension::Spectroscopic(SpectroscopicDetails {
                other_information: Some(serde_json::json!({"grating": "RGS"})),
            }),
        )
        .await
        .unwrap();

    assert!(
        PhotometricObservations::find()
            .all(&store.conn)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        SpectroscopicObservations::find()
            .all(&store.conn)
            .await
            .unwrap()
            .len(),
        1
    );

    let loaded = store.get_observation(observation.id).await.unwrap().unwrap();
    assert!(matches!(
        loaded.extension,
        Some(ObservationExtension::Spectroscopic(_))
    ));
}

#[tokio::test]
async fn test_list_for_schedule_loads_extensions() {
    let store = Store::in_memory().await.unwrap();
    let chain = build_chain(&store, "Chandra").await;

    store
        .create_observation(&photometric(chain.schedule_id, "Cas A"))
        .await
        .unwrap();
    store
        .create_observation(&NewObservation {
            observation_type: ObservationType::Spectroscopic,
            extension: Some(ObservationExtension::Spectroscopic(SpectroscopicDetails {
                other_information: None,
            })),
            ..photometric(chain.schedule_id, "Sgr A*")
        })
        .await
        .unwrap();
    store
        .create_observation(&NewObservation {
            extension: None,
            ..photometric(chain.schedule_id, "Bare")
        })
        .await
        .unwrap();

    let observations = store.list_observations(chain.schedule_id).await.unwrap();
    assert_eq!(observations.len(), 3);

    let by_name = |name: &str| {
        observations
            .iter()
            .find(|o| o.object_name == name)
            .unwrap()
            .extension
            .clone()
    };
    assert!(matches!(
        by_name("Cas A"),
        Some(ObservationExtension::Photometric(_))
    ));
    assert!(matches!(
        by_name("Sgr A*"),
        Some(ObservationExtension::Spectroscopic(_))
    ));
    assert!(by_name("Bare").is_none());
}

#[tokio::test]
async fn test_observatory_tree() {
    let store = Store::in_memory().await.unwrap();
    let chain = build_chain(&store, "Keck").await;
    store
        .create_telescope(&NewTelescope {
            name: "Keck II".to_string(),
            observatory_id: chain.observatory_id,
        })
        .await
        .unwrap();
    build_chain(&store, "Subaru").await;

    let tree = store
        .observatory_tree(chain.observatory_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tree.observatory.name, "Keck");
    assert_eq!(tree.telescopes.len(), 2);

    let first = tree
        .telescopes
        .iter()
        .find(|t| t.telescope.id == chain.telescope_id)
        .unwrap();
    assert_eq!(first.instruments.len(), 1);
    assert_eq!(first.instruments[0].instrument.id, chain.instrument_id);
    assert_eq!(first.instruments[0].schedules.len(), 1);

    assert!(store.observatory_tree(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_observatory_cascades() {
    let store = Store::in_memory().await.unwrap();
    let chain = build_chain(&store, "Spitzer").await;
    let observation = store
        .create_observation(&photometric(chain.schedule_id, "Orion"))
        .await
        .unwrap();

    assert!(store.delete_observatory(chain.observatory_id).await.unwrap());
    assert!(!store.delete_observatory(chain.observatory_id).await.unwrap());

    assert!(store.get_telescope(chain.telescope_id).await.unwrap().is_none());
    assert!(store.get_instrument(chain.instrument_id).await.unwrap().is_none());
    assert!(store.get_schedule(chain.schedule_id).await.unwrap().is_none());
    assert!(store.get_observation(observation.id).await.unwrap().is_none());
    assert!(
        PhotometricObservations::find()
            .all(&store.conn)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_status_updates() {
    let store = Store::in_memory().await.unwrap();
    let chain = build_chain(&store, "TESS").await;
    let observation = store
        .create_observation(&photometric(chain.schedule_id, "Pi Mensae"))
        .await
        .unwrap();

    let schedule = store
        .update_schedule_status(chain.schedule_id, across::domain::ScheduleStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(schedule.schedule_status, across::domain::ScheduleStatus::Completed);

    let updated = store
        .update_observation_status(observation.id, ObservationStatus::Canceled)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.observation_status, ObservationStatus::Canceled);
    assert!(updated.extension.is_some());

    assert!(
        store
            .update_observation_status(9999, ObservationStatus::Completed)
            .await
            .unwrap()
            .is_none()
    );
}
