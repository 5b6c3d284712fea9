#![no_main]
use libfuzzer_sys::fuzz_target;
use treffpunkt::score::{percentage, Rgb};
use treffpunkt::Tally;

fuzz_target!(|data: (u8, u8, u8)| {
    let tally = Tally::new(data.0.into(), data.1.into(), data.2.into());

    match percentage(&tally) {
        None => assert_eq!(tally.total(), 0, "Only empty tallies go unscored"),
        Some(p) => {
            assert!((0.0..=1.0).contains(&p), "Percentage {} out of range", p);

            let color = Rgb::from_percentage(p);
            if tally.no == 0 && tally.maybe == 0 {
                assert_eq!(color, Rgb::new(34, 197, 94));
            }
            if tally.yes == 0 && tally.maybe == 0 {
                assert_eq!(color, Rgb::new(239, 68, 68));
            }
        }
    }
});
