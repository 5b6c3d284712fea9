#![no_main]
use libfuzzer_sys::fuzz_target;
use treffpunkt::{Aggregate, Answer, Responses};

fuzz_target!(|data: Vec<(String, Vec<Answer>)>| {
    #[cfg(feature = "log")]
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(std::io::stdout())
        .apply();

    let forward: Vec<&Answer> = data.iter().flat_map(|(_, a)| a.iter()).collect();
    let aggregate = forward.iter().copied().aggregate();

    let backward = data
        .iter()
        .rev()
        .flat_map(|(_, a)| a.iter().rev())
        .aggregate();
    assert_eq!(aggregate, backward, "Aggregate depends on answer order");

    assert_eq!(
        aggregate.iter().map(|a| a.tally.total() as usize).sum::<usize>(),
        forward.len(),
        "Every answer should be counted exactly once"
    );

    assert!(
        aggregate.windows(2).all(|w| w[0].slot < w[1].slot),
        "Records should be distinct and ordered"
    );

    let responses: Responses = data.into_iter().collect();
    #[cfg(feature = "rayon")]
    assert_eq!(responses.par_aggregate(), responses.aggregate());

    for record in responses.aggregate() {
        assert!(
            responses.answers().any(|a| a.slot.matches(&record.slot)),
            "Record {} was never answered",
            record.slot
        );
    }
});
