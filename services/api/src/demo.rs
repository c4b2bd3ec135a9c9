use crate::infra::{
    demo_authenticator, seed_demo_users, InMemoryBlobStore, InMemoryRewardsStore, ADMIN_TOKEN,
    CITIZEN_TOKEN, COLLECTOR_TOKEN,
};
use clap::Args;
use plastiside::error::AppError;
use plastiside::rewards::{BlobStore, RewardPolicy, RewardsStack, SubmissionIntake};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Debit granted points when a submission is rejected (off by default,
    /// matching the production policy).
    #[arg(long)]
    pub(crate) reclaim_rejected: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { reclaim_rejected } = args;

    let store = Arc::new(InMemoryRewardsStore::default());
    seed_demo_users(&store)?;
    let blobs = InMemoryBlobStore::default();
    let stack = RewardsStack::new(
        Arc::new(demo_authenticator()),
        store,
        RewardPolicy { reclaim_rejected },
    );

    println!("Citizen recycling rewards demo");
    println!(
        "Rejected submissions {} granted points",
        if reclaim_rejected { "forfeit" } else { "keep" }
    );

    let photo = blobs.store("bottles.jpg", b"demo-jpeg-bytes")?;
    println!("\nStored submission photo at {}", photo.url);

    println!("\nCitizen drops off plastic");
    let first = stack.ledger.submit(
        Some(CITIZEN_TOKEN),
        SubmissionIntake {
            plastic_type: Some("PET".to_string()),
            weight_kg: Some(2.0),
            quantity: Some(5),
            location: Some("Center A".to_string()),
            description: Some("Clean water bottles".to_string()),
            photo: Some(photo.url.clone()),
        },
    )?;
    println!(
        "- {}: PET 2.0kg x5 -> {} points (total {}, rank {})",
        first.submission.id.0,
        first.submission.points_earned,
        first.owner.points,
        first.owner.rank.label()
    );

    let second = stack.ledger.submit(
        Some(CITIZEN_TOKEN),
        SubmissionIntake {
            plastic_type: Some("HDPE".to_string()),
            weight_kg: Some(3.0),
            quantity: Some(2),
            location: Some("Center A".to_string()),
            description: None,
            photo: None,
        },
    )?;
    println!(
        "- {}: HDPE 3.0kg x2 -> {} points (total {}, rank {})",
        second.submission.id.0,
        second.submission.points_earned,
        second.owner.points,
        second.owner.rank.label()
    );

    println!("\nCollector reviews the queue");
    let confirmed = stack
        .verification
        .resolve(Some(COLLECTOR_TOKEN), &first.submission.id, "verified")?;
    println!(
        "- {} confirmed by {}",
        confirmed.submission.id.0,
        confirmed
            .submission
            .verified_by
            .as_ref()
            .map(|id| id.0.as_str())
            .unwrap_or("unknown")
    );

    let rejected = stack
        .verification
        .resolve(Some(COLLECTOR_TOKEN), &second.submission.id, "rejected")?;
    println!(
        "- {} rejected; owner now holds {} points (rank {})",
        rejected.submission.id.0,
        rejected.owner.points,
        rejected.owner.rank.label()
    );

    println!("\nAdmin dashboard");
    let snapshot = stack.analytics.report(Some(ADMIN_TOKEN))?;
    println!(
        "- {} users | {} submissions | {} points distributed",
        snapshot.total_users, snapshot.total_submissions, snapshot.total_points_distributed
    );
    for line in &snapshot.submissions_by_type {
        println!(
            "  - {}: {:.1} kg across {} submission(s)",
            line.plastic_type.label(),
            line.total_weight_kg,
            line.submission_count
        );
    }

    let export = stack.analytics.export_submissions_csv(Some(ADMIN_TOKEN))?;
    println!(
        "- CSV export ready ({} rows)",
        export.lines().count().saturating_sub(1)
    );

    println!("\nUser directory");
    for user in stack.directory.list_users(Some(ADMIN_TOKEN))? {
        println!(
            "- {} {} <{}> [{}] {} points, rank {}",
            user.first_name,
            user.last_name,
            user.email,
            user.role.label(),
            user.points,
            user.rank.label()
        );
    }

    let branding = stack.settings.public_view()?;
    println!(
        "\nBranding: {} ({} / {})",
        branding.company_name, branding.primary_color, branding.secondary_color
    );
    println!("Blob store holds {} object(s)", blobs.objects().len());

    Ok(())
}
