use crate::services::AverageMaintainer;

/// Rebuild every movie's cached average from its ratings
pub async fn recompute_averages(average_maintainer: &AverageMaintainer) -> Result<usize, Box<dyn std::error::Error>> {
    tracing::info!("Recomputing average ratings for all movies...");

    let count = average_maintainer.recompute_all().await?;

    tracing::info!("Recomputed averages of {} movies", count);
    println!("Recomputed averages of {} movies", count);
    Ok(count)
}
