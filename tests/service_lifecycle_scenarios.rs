//! Behaviour tests for the service connection lifecycle.

mod service_lifecycle_steps;

use rstest_bdd_macros::scenario;
use service_lifecycle_steps::world::{LifecycleWorld, world};

#[scenario(
    path = "tests/features/service_lifecycle.feature",
    name = "Connect GitHub with a valid-looking token"
)]
#[tokio::test(flavor = "multi_thread")]
async fn connect_github_with_valid_token(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/service_lifecycle.feature",
    name = "Declining the credential prompt leaves the service disconnected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn declined_prompt_leaves_disconnected(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/service_lifecycle.feature",
    name = "Stripe rejects a publishable key"
)]
#[tokio::test(flavor = "multi_thread")]
async fn stripe_rejects_publishable_key(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/service_lifecycle.feature",
    name = "Disconnecting a disconnected service changes nothing"
)]
#[tokio::test(flavor = "multi_thread")]
async fn disconnect_noop(world: LifecycleWorld) {
    let _ = world;
}
