pub(crate) const FRAGMENT_BODY: &str = r"
#define MAX_COLORS 8

float ringMask(vec2 s, float t, float index) {
    vec2 r = sin(1.5 * (s.yx * uFrequency) + 2.0 * cos(s * uFrequency));
    float m0 = length(r + sin(5.0 * r.y * uFrequency - 3.0 * t + index) / 4.0);
    float kBelow = clamp(uWarpStrength, 0.0, 1.0);
    float kMix = pow(kBelow, 0.3);
    float gain = 1.0 + max(uWarpStrength - 1.0, 0.0);
    vec2 disp = (r - s) * kBelow;
    vec2 warped = s + disp * gain;
    float m1 = length(warped + sin(5.0 * warped.y * uFrequency - 3.0 * t + index) / 4.0);
    float m = mix(m0, m1, kMix);
    return 1.0 - exp(-6.0 / exp(6.0 * m));
}

void main() {
    float t = uTime * uSpeed;
    vec2 p = v_uv * 2.0 - 1.0;
    p += uPointer * uParallax * 0.1;
    vec2 rp = vec2(p.x * uRot.x - p.y * uRot.y, p.x * uRot.y + p.y * uRot.x);
    vec2 q = vec2(rp.x * (uCanvas.x / uCanvas.y), rp.y);
    q /= max(uScale, 0.0001);
    q /= 0.5 + 0.2 * dot(q, q);
    q += 0.2 * cos(t) - 7.56;
    vec2 toward = uPointer - rp;
    q += toward * uMouseInfluence * 0.2;

    vec3 col = vec3(0.0);
    float a = 1.0;

    if (uColorCount > 0) {
        vec2 s = q;
        vec3 sumCol = vec3(0.0);
        float cover = 0.0;
        for (int i = 0; i < MAX_COLORS; ++i) {
            if (i >= uColorCount) {
                break;
            }
            s -= 0.01;
            float w = ringMask(s, t, float(i));
            sumCol += uColors[i] * w;
            cover = max(cover, w);
        }
        col = clamp(sumCol, 0.0, 1.0);
        a = uTransparent > 0 ? cover : 1.0;
    } else {
        vec2 s = q - 0.01;
        float red = ringMask(s, t, 0.0);
        s -= 0.01;
        float green = ringMask(s, t, 1.0);
        s -= 0.01;
        float blue = ringMask(s, t, 2.0);
        col = vec3(red, green, blue);
        a = uTransparent > 0 ? max(max(red, green), blue) : 1.0;
    }

    if (uNoise > 0.0001) {
        float n = fract(sin(dot(gl_FragCoord.xy + vec2(uTime), vec2(12.9898, 78.233))) * 43758.5453123);
        col = clamp(col + (n - 0.5) * uNoise, 0.0, 1.0);
    }

    vec3 rgb = uTransparent > 0 ? col * a : col;
    outColor = vec4(rgb, a);
}
";
