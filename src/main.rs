use nagare_tools::{GenerateIdService, SpatioTemporalIdGenerator, Timer, loggers};

fn main() {
    loggers::init();

    let mut timer = Timer::new("main");
    timer.start();

    // 既定構成: 深度[0, 100] / タイムライン[0, 240]
    let idgen = GenerateIdService::<SpatioTemporalIdGenerator>::default();

    let generate = timer.child("generate");
    generate.start();

    for step in 0..5 {
        let time = step as f64 * 10.0;
        match idgen.obtain_id(135.0, 35.0, 10.0, time) {
            Ok(id) => println!("t={time}: {id}"),
            Err(e) => eprintln!("{e}"),
        }
    }

    generate.stop();
    timer.stop();

    println!("-----------");
    println!("in use: {}", idgen.total_in_use());
    print!("{}", timer.report());
}
