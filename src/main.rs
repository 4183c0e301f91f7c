fn main() -> anyhow::Result<()> {
    klondike_web::run()
}
