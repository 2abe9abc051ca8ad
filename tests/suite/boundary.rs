//! End-to-end behaviour of the service boundary.

use std::sync::Arc;

use futures_util::future::join_all;

use corral_service::{BoundaryError, Service};

use crate::common::{config_from, fast_service, payload_counts};

#[tokio::test]
async fn test_single_item_submit_returns_reply_as_body() {
    let service = fast_service();
    let body = service
        .handle_confined(br#"{"data":"test-msg"}"#)
        .await
        .unwrap();
    assert_eq!(body, "confined processed: test-msg");
}

#[tokio::test]
async fn test_batch_submit_response_shape() {
    let service = fast_service();
    let response = service
        .handle_process(br#"["task1","task2","task3"]"#)
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&response.to_string()).unwrap();
    let processed = json["processed"].as_array().unwrap();
    assert_eq!(processed.len(), 3);
    assert!(response.to_string().contains("task1"));

    let counts = payload_counts(&response.processed);
    assert_eq!(counts.len(), 3);
    assert!(counts.values().all(|&c| c == 1));
}

#[tokio::test]
async fn test_malformed_payloads_never_reach_the_core() {
    let service = fast_service();

    let confined_bodies: [&[u8]; 3] = [b"not json", br#"{"data": 1}"#, br#"[1, 2]"#];
    for body in confined_bodies {
        let err = service.handle_confined(body).await.unwrap_err();
        assert!(err.is_client_error(), "{err}");
    }
    let batch_bodies: [&[u8]; 3] = [b"{", br#"{"data":"x"}"#, br#"["a", null]"#];
    for body in batch_bodies {
        let err = service.handle_process(body).await.unwrap_err();
        assert!(matches!(err, BoundaryError::Decode(_)), "{err}");
    }

    assert!(service.shutdown().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mixed_traffic() {
    let service = Arc::new(fast_service());

    let confined = join_all((0..25).map(|i| {
        let service = Arc::clone(&service);
        async move {
            let body = format!(r#"{{"data":"c{i}"}}"#);
            service.handle_confined(body.as_bytes()).await
        }
    }));
    let batches = join_all((0..5).map(|b| {
        let service = Arc::clone(&service);
        async move {
            let body = serde_json::to_vec(&(0..10).map(|i| format!("b{b}-{i}")).collect::<Vec<_>>())
                .unwrap();
            service.handle_process(&body).await
        }
    }));

    let (confined, batches) = tokio::join!(confined, batches);
    assert!(confined.iter().all(Result::is_ok));
    for batch in batches {
        assert_eq!(batch.unwrap().processed.len(), 10);
    }

    let service = Arc::try_unwrap(service).expect("sole owner");
    assert_eq!(service.shutdown().await.unwrap().len(), 25);
}

#[tokio::test]
async fn test_cumulative_mode_is_explicit() {
    let service = Service::start(&config_from(
        "[pool]\nwork_delay_ms = 0\nstore = \"cumulative\"\n",
    ));
    let first = service.handle_process(br#"["a"]"#).await.unwrap();
    let second = service.handle_process(br#"["b","c"]"#).await.unwrap();
    assert_eq!(first.processed.len(), 1);
    assert_eq!(second.processed.len(), 3);
}

#[tokio::test]
async fn test_oversized_batch_rejected_before_processing() {
    let service = Service::start(&config_from(
        "[pool]\nwork_delay_ms = 0\nmax_batch_size = 3\nstore = \"cumulative\"\n",
    ));
    let err = service
        .handle_process(br#"["a","b","c","d"]"#)
        .await
        .unwrap_err();
    assert!(matches!(err, BoundaryError::BatchTooLarge { len: 4, max: 3 }));

    // Nothing from the rejected batch landed in the shared store.
    let next = service.handle_process(br#"["e"]"#).await.unwrap();
    assert_eq!(next.processed.len(), 1);
}

#[tokio::test]
async fn test_ready_until_clean_shutdown() {
    let service = fast_service();
    assert!(service.is_ready());
    let log = service.shutdown().await.unwrap();
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_greeting_and_status() {
    let service = fast_service();
    assert_eq!(service.greet(""), "Hello World Openshift!");
    assert_eq!(service.greet("world"), "Hello, world!");
    assert_eq!(service.status().await.unwrap(), "System status: OK");
}
