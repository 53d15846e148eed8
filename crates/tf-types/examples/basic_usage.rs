use tf_types::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Team formation basic usage example");

    // Describe a couple of participants
    let aaron = ParticipantRequest::new("aaron")
        .with_specialities(["software"])
        .with_requests(["joy"]);
    let joy = ParticipantRequest::new("joy")
        .with_specialities(["ui/ux", "software"])
        .with_requests(["aaron"]);
    let kevin = ParticipantRequest::new("kevin").with_specialities(["ui/ux"]).noob(true);

    println!("aaron and joy mutual: {}", aaron.is_mutual_with(&joy));
    println!("kevin is a noob: {}", kevin.noob);

    // Build and validate a configuration
    let config = FormationConfig::new(2).with_seed(7).apply_env()?;
    config.validate()?;
    println!(
        "team size {}, {} speciality tags, stall budget for 4 teams: {}",
        config.team_size,
        config.specialities.len(),
        config.stall_limit(4)
    );

    // Group them into a team and print the downstream projection
    let team = Team::new(vec![aaron, joy, kevin]);
    println!("Team {} has {} members", team, team.len());
    println!("{}", serde_json::to_string_pretty(&team.summaries())?);

    println!("Example completed successfully");
    Ok(())
}
