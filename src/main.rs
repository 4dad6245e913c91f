fn main() {
    env_logger::init();
    println!("{}", iondose::version_banner());
}
