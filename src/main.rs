fn main() {
    gem_dozer::game::run();
}
