//! Headless walkthrough of capability-checked references.
//!
//! Run with `RUST_LOG=debug cargo run --example demo` to also see the
//! warnings and errors emitted through [`LogSink`].

use capref::{
    AssignTarget, Component, LogSink, Scene, Verifier, VerifierGroup, resolve_target,
};

trait Damageable {
    fn hit_points(&self) -> i32;
    fn apply_damage(&mut self, amount: i32);
}

#[derive(Component)]
#[provides(Damageable)]
struct Barrel {
    hp: i32,
}

impl Damageable for Barrel {
    fn hit_points(&self) -> i32 {
        self.hp
    }

    fn apply_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }
}

#[derive(Component)]
struct Sparkle;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let sink = LogSink;

    let mut scene = Scene::new();
    let barrel_entity = scene.spawn();
    scene.attach(barrel_entity, capref::Name::new("Explosive Barrel"));
    let barrel = scene.attach(barrel_entity, Barrel { hp: 60 });
    let sparkle_entity = scene.spawn();
    let sparkle = scene.attach(sparkle_entity, Sparkle);

    // Assign by dropping a component: the barrel satisfies Damageable.
    let mut weapon_target = Verifier::<dyn Damageable>::new();
    let applied = weapon_target.apply_assignment(
        &scene,
        Some(AssignTarget::Component(barrel)),
        &sink,
    );
    println!("barrel drop applied: {applied}");

    // The sparkle does not; the drop is rejected (warning in the log) and the
    // barrel reference survives.
    let applied = weapon_target.apply_assignment(
        &scene,
        Some(AssignTarget::Component(sparkle)),
        &sink,
    );
    println!(
        "sparkle drop applied: {applied}, still targeting hp = {}",
        weapon_target.resolve(&scene).unwrap().hit_points()
    );

    // Dropping a whole entity scans its components in attachment order and
    // takes the first provider.
    let resolved = resolve_target::<dyn Damageable>(
        &scene,
        AssignTarget::Composite(barrel_entity),
        &sink,
    );
    println!("entity drop resolved to: {:?}", resolved);

    // Groups sweep loudly and iterate quietly.
    let mut targets = VerifierGroup::<dyn Damageable>::from_verifiers(vec![
        Verifier::with_reference(barrel),
        Verifier::new(),
    ]);
    targets.verify(&scene, &sink); // error in the log for the empty slot
    targets.for_each(&scene, &sink, |target| {
        println!("iterating target with hp = {}", target.hit_points());
    });

    // References are plain data; they survive serialization and go stale
    // gracefully when the scene moves on.
    let saved = ron::to_string(&weapon_target).expect("verifier serializes");
    println!("saved verifier: {saved}");

    scene.despawn(barrel_entity);
    let restored: Verifier<dyn Damageable> = ron::from_str(&saved).expect("verifier deserializes");
    println!(
        "after despawn, restored reference is valid: {}",
        restored.is_valid(&scene)
    );
}
