fn main() -> anyhow::Result<()> {
    vantage::app::run("textures/vibrant.png")
}
