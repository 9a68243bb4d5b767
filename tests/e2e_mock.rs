// Copyright 2024, The Tremor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod workspace;

use std::time::Duration;
use tremor_loganalytics::e2e::{EndToEnd, BATCH_SIZE, LOG_TYPE};
use tremor_loganalytics::Error;
use workspace::{batch_query, single_query, MockWorkspace};

#[tokio::test(flavor = "multi_thread")]
async fn send_wait_and_verify() -> anyhow::Result<()> {
    let _ = env_logger::try_init();
    let mut ws = MockWorkspace::new().await;
    let mut e2e = EndToEnd::with_clients(ws.logger()?, ws.data()?)
        .with_ingestion_latency(Duration::from_millis(10));

    let posts = ws.expect_posts(LOG_TYPE, 2).await;
    let batch = ws
        .answer(
            &batch_query(e2e.batch_id()),
            BATCH_SIZE,
            [e2e.batch_id(), "e2etest", "e2ecriticality"],
        )
        .await;
    let single = ws
        .answer(
            &single_query(e2e.single_id()),
            1,
            [
                e2e.single_id(),
                "e2etestsingleentry",
                "e2ecriticalitysingleentry",
            ],
        )
        .await;

    e2e.run().await?;

    posts.assert_async().await;
    batch.assert_async().await;
    single.assert_async().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_rows_fail_verification() -> anyhow::Result<()> {
    let mut ws = MockWorkspace::new().await;
    let mut e2e = EndToEnd::with_clients(ws.logger()?, ws.data()?);
    let id = e2e.batch_id().to_string();
    let _rows = ws
        .answer(
            &batch_query(&id),
            BATCH_SIZE - 1,
            [id.as_str(), "e2etest", "e2ecriticality"],
        )
        .await;

    match e2e.verify_batch().await {
        Err(Error::Verification {
            check,
            expected,
            actual,
        }) => {
            assert_eq!(check, "row count");
            assert_eq!(expected, BATCH_SIZE.to_string());
            assert_eq!(actual, (BATCH_SIZE - 1).to_string());
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_labels_fail_verification() -> anyhow::Result<()> {
    let mut ws = MockWorkspace::new().await;
    let mut e2e = EndToEnd::with_clients(ws.logger()?, ws.data()?);
    let id = e2e.single_id().to_string();
    let _rows = ws
        .answer(
            &single_query(&id),
            1,
            [id.as_str(), "e2etest", "e2ecriticalitysingleentry"],
        )
        .await;

    assert!(matches!(
        e2e.verify_single().await,
        Err(Error::Verification { check, .. }) if check == "SystemSource_s"
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_send_stops_the_run() -> anyhow::Result<()> {
    let mut ws = MockWorkspace::new().await;
    let mut e2e = EndToEnd::with_clients(ws.logger()?, ws.data()?)
        .with_ingestion_latency(Duration::from_millis(10));
    let _rejected = ws
        .collector
        .mock("POST", mockito::Matcher::Any)
        .with_status(403)
        .with_body("Forbidden")
        .create_async()
        .await;
    let queries = ws
        .api
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let res = e2e.run().await;
    assert!(matches!(res, Err(Error::Azure(ref e)) if e.is_rejected()));
    queries.assert_async().await;
    Ok(())
}
