use std::sync::Arc;

use serde::Serialize;
use tokio::time::{Duration, sleep};

use tether_core::future::{ChainStep, WaitOutcome, wait_all};
use tether_core::impls::InMemoryStatusStore;
use tether_core::typed::{Job, JobClient};

#[derive(Debug, Serialize)]
struct Resize {
    path: String,
    width: u32,
}

impl Job for Resize {
    const TYPE: &'static str = "image.resize";
}

#[derive(Debug, Serialize)]
struct Publish {
    path: String,
}

impl Job for Publish {
    const TYPE: &'static str = "image.publish";
}

/// fake worker：Queued なジョブを拾って完了させる（本物の worker の代役）
async fn worker_loop(store: Arc<InMemoryStatusStore>) {
    loop {
        let Some(envelope) = store.claim_next().await else {
            sleep(Duration::from_millis(10)).await;
            continue;
        };
        println!("working: id={} type={}", envelope.id, envelope.job_type);
        sleep(Duration::from_millis(50)).await;

        // 結果 payload は「submit された params + 実行メモ」にする
        let mut payload = envelope.params.clone();
        payload.insert("done_by".into(), serde_json::json!("fake-worker"));
        if let Err(e) = store.complete(&envelope.id, payload).await {
            eprintln!("[worker] complete failed: {e}");
        }
    }
}

#[tokio::main]
async fn main() {
    // (A) store と client を用意
    let store = Arc::new(InMemoryStatusStore::new());
    let client = JobClient::new(store.clone());

    // (B) fake worker を起動（今回は 1 本）
    let worker = tokio::spawn(worker_loop(store.clone()));

    // (C) ジョブ投入 + then で chain（下流の submit は上流完了後に起きる）
    let resize = client
        .submit(&Resize {
            path: "cat.png".into(),
            width: 640,
        })
        .await
        .expect("submit resize");
    let chained = resize.then(|status| {
        let path = status
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or("resize result has no path")?
            .to_string();
        ChainStep::job(&Publish { path })
    });

    // (D) 独立ジョブも投げて、wait_all でまとめて待つ（入力順 = 出力順）
    let other = client
        .submit(&Resize {
            path: "dog.png".into(),
            width: 320,
        })
        .await
        .expect("submit other");

    let outcomes = wait_all(vec![chained, other]).await.expect("wait_all");
    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            WaitOutcome::Status(status) => {
                println!(
                    "[{i}] id={} state={:?} payload={}",
                    status.id,
                    status.state,
                    serde_json::to_string(&status.payload).expect("payload json"),
                );
            }
            WaitOutcome::Value(value) => println!("[{i}] value={value}"),
        }
    }

    println!("counts: {:?}", store.counts_by_state().await);

    // (E) サンプルなので worker を止める（本番の worker は外部プロセス）
    worker.abort();
}
