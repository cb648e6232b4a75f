use std::error::Error;

use clap::ArgMatches;
use log::info;
use loopsong_lib::config::LoopDefinition;
use loopsong_lib::playback::output::{OutputDevice, OutputMixer, TrackStream};
use loopsong_lib::playback::{PlaybackWindow, ScheduleConfig, Scheduler, Stream};
use loopsong_lib::timing::Clock;

use crate::cli::args::Options;
use crate::progress::ProgressLine;

pub fn run(args: &ArgMatches) -> Result<i32, Box<dyn Error>> {
    let options = Options::from_matches(args);
    let definition = LoopDefinition::load(&options.config, options.section.as_deref())?;

    info!("song:   {}", definition.song.display());
    info!("start:  {}", definition.start);
    info!("end:    {}", definition.end);
    info!("time:   {}", options.duration);
    info!("fade:   {}", options.fade);
    info!("seek:   {}", options.seek);
    info!("policy: {}", options.policy);
    info!("adjust: {}", options.adjust);

    // Release order is the reverse of this acquisition order.
    let device = OutputDevice::open()?;
    let mixer = OutputMixer::connect(&device);
    let mut track = TrackStream::load(&definition.song)?;
    info!(
        "length: {} ({} channel(s) at {} Hz)",
        track.length(),
        track.channels(),
        track.sample_rate()
    );

    let window = PlaybackWindow::compute(
        definition.start,
        definition.end,
        options.seek,
        track.length(),
    );
    let scheduler = Scheduler::new(ScheduleConfig {
        window,
        target: options.duration,
        fade: options.fade,
        policy: options.policy,
    });

    let mut clock = Clock::system(options.adjust);
    let mut progress = ProgressLine::new(options.quiet);
    let result = scheduler.run(&mut track, &mixer, &mut clock, &mut |report| {
        progress.update(report)
    });
    progress.finish();
    let outcome = result?;

    info!(
        "played {:.2}s of {:.2}s requested",
        outcome.elapsed, outcome.requested
    );
    if clock.adjusted_offset() > 0.0 {
        info!("discounted {:.2}s of stalled time", clock.adjusted_offset());
    }

    Ok(0)
}
